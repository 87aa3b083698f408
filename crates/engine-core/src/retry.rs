use crate::error::StoreError;

/// Indicates whether a failed pass is worth triggering again unchanged.
///
/// The core itself never retries; the scheduler that owns pass triggering
/// reads this to decide between waiting for the next tick and paging someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retry,
    Stop,
}

pub fn classify_store_error(err: &StoreError) -> RetryDisposition {
    match err {
        StoreError::Sled(_) | StoreError::Redis(_) => RetryDisposition::Retry,
        // A corrupt watermark reads the same way on every attempt
        StoreError::Utf8 { .. } | StoreError::Decode { .. } => RetryDisposition::Stop,
    }
}
