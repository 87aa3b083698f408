use thiserror::Error;

/// Errors raised when loading window or source settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A setting was present but not acceptable.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Source settings could not be read as JSON.
    #[error("Failed to parse source settings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SettingsError {
    pub fn invalid(key: &str, value: impl ToString, reason: &str) -> Self {
        SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
