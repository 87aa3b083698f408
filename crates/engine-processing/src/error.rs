use crate::source::SourceError;
use chrono::{DateTime, Utc};
use engine_config::settings::SettingsError;
use engine_core::{
    error::StoreError,
    retry::{RetryDisposition, classify_store_error},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Source '{0}' is not registered")]
    UnknownSource(String),

    #[error("Source '{0}' is already registered")]
    DuplicateSource(String),

    /// More records share one change instant than the limit allows.
    #[error(
        "{source_name} exceeded {limit} records: at least {limit} records share change instant {finish} (window start {start})"
    )]
    MaxCountExceeded {
        source_name: String,
        limit: usize,
        start: DateTime<Utc>,
        finish: DateTime<Utc>,
    },

    #[error("Fetch failed for '{source_name}' in [{from}, {to}): {source}")]
    Fetch {
        source_name: String,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        #[source]
        source: SourceError,
    },

    #[error("Processing failed for '{source_name}' ({count} records): {source}")]
    Process {
        source_name: String,
        count: usize,
        #[source]
        source: SourceError,
    },

    #[error("Watermark store error: {0}")]
    Store(#[from] StoreError),
}

impl PassError {
    /// Whether the next scheduled pass can be expected to succeed unchanged.
    pub fn disposition(&self) -> RetryDisposition {
        match self {
            PassError::Fetch { .. } | PassError::Process { .. } => RetryDisposition::Retry,
            PassError::Store(err) => classify_store_error(err),
            PassError::InvalidConfiguration(_)
            | PassError::Settings(_)
            | PassError::UnknownSource(_)
            | PassError::DuplicateSource(_)
            | PassError::MaxCountExceeded { .. } => RetryDisposition::Stop,
        }
    }
}
