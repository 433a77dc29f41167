use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or saving settings.
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    /// The settings document is not valid JSON or has a wrongly typed value.
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),
}
