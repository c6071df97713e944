use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Arogya";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "AROGYA_DATA_DIR";

/// Forward window (minutes) inside which a medication counts as due.
pub const DUE_TOLERANCE_MINUTES: i64 = 5;

/// How often the reminder poller re-evaluates `due_now`.
pub const REMINDER_POLL_INTERVAL_SECS: u64 = 60;

/// Gemini defaults. The key itself only ever comes from the environment.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GEMINI_TIMEOUT_SECS: u64 = 60;

/// Origin used for emergency-card share links when none is given.
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:3000";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,arogya_lib=debug"
}

/// Get the application data directory.
/// `$AROGYA_DATA_DIR` when set, otherwise ~/Arogya/.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the client storage database inside a data directory.
pub fn database_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("arogya.db")
}

/// Directory that receives exported digests.
pub fn exports_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("exports")
}

/// Gemini API key, if configured.
pub fn gemini_api_key() -> Option<String> {
    std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// Gemini model name, falling back to the default flash model.
pub fn gemini_model() -> String {
    std::env::var(GEMINI_MODEL_ENV)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string())
}
