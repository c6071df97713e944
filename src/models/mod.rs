pub mod enums;
pub mod medication;
pub mod mood;
pub mod profile;

pub use enums::*;
pub use medication::*;
pub use mood::*;
pub use profile::*;
