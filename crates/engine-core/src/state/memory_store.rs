//! In-memory watermark store for tests and single-process embedding.
//!
//! Values go through the same text codec as the durable stores so precision
//! behaves identically.

use crate::{
    error::StoreError,
    state::{WatermarkStore, codec},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryWatermarkStore {
    values: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an initial watermark
    pub fn with_value(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), codec::encode(&value));
        Self {
            values: RwLock::new(values),
            writes: AtomicUsize::new(0),
        }
    }

    /// Create with stored text that bypasses the codec, e.g. a corrupt value.
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), raw.into());
        Self {
            values: RwLock::new(values),
            writes: AtomicUsize::new(0),
        }
    }

    /// Raw stored text, as a durable store would hold it.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    /// Number of successful `set` calls since creation.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatermarkStore for MemoryWatermarkStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.values.read().await.get(key) {
            Some(raw) => codec::decode(key, raw),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), codec::encode(&value));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory_watermark_store"
    }
}
