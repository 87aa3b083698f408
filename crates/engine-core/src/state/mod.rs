use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod codec;
pub mod memory_store;
pub mod redis_store;
pub mod sled_store;

/// Durable key → watermark map.
///
/// Last write wins per key; callers guarantee a single writer per key.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Returns the watermark for `key`, or `None` if nothing was persisted yet.
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Persists `value` as the watermark for `key`.
    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), StoreError>;

    fn name(&self) -> &'static str;
}
