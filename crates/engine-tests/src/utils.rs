use crate::FixtureSource;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use engine_config::settings::{SourceSettings, WindowSettings};
use engine_core::{
    error::StoreError,
    state::{WatermarkStore, memory_store::MemoryWatermarkStore},
};
use engine_processing::{pass::PassRunner, registry::SourceRegistry};
use model::{pass::BatchLimit, time::Lookback};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

pub const ORDERS: &str = "orders_sync";

/// Fixed "now" for every scenario.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn secs(n: i64) -> TimeDelta {
    TimeDelta::seconds(n)
}

pub fn settings(limit: usize, stale_age_secs: i64) -> SourceSettings {
    let limit = BatchLimit::max(limit).unwrap_or(BatchLimit::Disabled);
    SourceSettings::new(limit, Lookback::from_secs(stale_age_secs)).unwrap()
}

pub fn disabled(stale_age_secs: i64) -> SourceSettings {
    SourceSettings::new(BatchLimit::Disabled, Lookback::from_secs(stale_age_secs)).unwrap()
}

/// Register `source` as [`ORDERS`] behind a runner with the default buffer.
pub fn runner_for(source: Arc<FixtureSource>, store: Arc<dyn WatermarkStore>) -> PassRunner {
    runner_with(source, store, WindowSettings::default())
}

pub fn runner_with(
    source: Arc<FixtureSource>,
    store: Arc<dyn WatermarkStore>,
    window: WindowSettings,
) -> PassRunner {
    let mut registry = SourceRegistry::new();
    registry.register(ORDERS, source).unwrap();
    PassRunner::new(Arc::new(registry), store, window)
}

pub fn memory_store() -> Arc<MemoryWatermarkStore> {
    Arc::new(MemoryWatermarkStore::new())
}

/// A memory store whose reads or writes can be switched to fail like a lost
/// redis connection.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryWatermarkStore,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryWatermarkStore {
        &self.inner
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    fn unavailable() -> StoreError {
        StoreError::from(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )))
    }
}

#[async_trait]
impl WatermarkStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), StoreError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.set(key, value).await
    }

    fn name(&self) -> &'static str {
        "failing_store"
    }
}
