//! CLI command handlers.
//!
//! Each handler takes the open session plus parsed arguments and writes
//! human-readable output to `out`, so tests can capture it.

pub mod ask;
pub mod digest;
pub mod journal;
pub mod medications;
pub mod profile;

use thiserror::Error;

use crate::ai::GatewayError;
use crate::digest::DigestError;
use crate::error::StoreError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CommandResult = Result<(), CommandError>;

/// Value or the report placeholder for blank fields.
pub(crate) fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}
