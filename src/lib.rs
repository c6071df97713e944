pub mod ai; // Text-generation boundary (Gemini)
pub mod commands;
pub mod config;
pub mod db;
pub mod digest; // Printable health digest
pub mod emergency;
pub mod error;
pub mod journal; // Mood journal
pub mod medications; // Medication reminders
pub mod metrics;
pub mod models;
pub mod profile;
pub mod session;

use tracing_subscriber::EnvFilter;

pub use error::StoreError;
pub use session::HealthSession;

/// Installs the global tracing subscriber. `RUST_LOG` wins; otherwise the
/// configured default, or `debug` everywhere when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        config::default_log_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
