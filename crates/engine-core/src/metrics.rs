use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    passes_completed: AtomicU64,
    passes_empty: AtomicU64,
    passes_disabled: AtomicU64,
    passes_failed: AtomicU64,
    records_processed: AtomicU64,
    records_deferred: AtomicU64,
}

/// Pass counters shared by every pass a runner executes.
#[derive(Debug, Clone)]
pub struct PassMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassMetricsSnapshot {
    pub passes_completed: u64,
    pub passes_empty: u64,
    pub passes_disabled: u64,
    pub passes_failed: u64,
    pub records_processed: u64,
    pub records_deferred: u64,
}

impl PassMetrics {
    pub fn new() -> Self {
        PassMetrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_completed(&self) {
        self.inner.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_empty(&self) {
        self.inner.passes_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_disabled(&self) {
        self.inner.passes_disabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.inner.passes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_processed(&self, count: u64) {
        self.inner
            .records_processed
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Records dropped by the batch guard and left for the next pass.
    pub fn increment_deferred(&self, count: u64) {
        self.inner
            .records_deferred
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PassMetricsSnapshot {
        PassMetricsSnapshot {
            passes_completed: self.inner.passes_completed.load(Ordering::Relaxed),
            passes_empty: self.inner.passes_empty.load(Ordering::Relaxed),
            passes_disabled: self.inner.passes_disabled.load(Ordering::Relaxed),
            passes_failed: self.inner.passes_failed.load(Ordering::Relaxed),
            records_processed: self.inner.records_processed.load(Ordering::Relaxed),
            records_deferred: self.inner.records_deferred.load(Ordering::Relaxed),
        }
    }
}

impl Default for PassMetrics {
    fn default() -> Self {
        Self::new()
    }
}
