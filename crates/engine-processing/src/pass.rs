use crate::{
    error::PassError,
    guard::BatchGuard,
    registry::SourceRegistry,
    source::ChangeSource,
    window::{OpenWindow, Window},
};
use chrono::{DateTime, Utc};
use engine_config::settings::WindowSettings;
use engine_core::{metrics::PassMetrics, state::WatermarkStore};
use model::{
    pass::{BatchLimit, PassArgs, tracking_key},
    time::VisibilityBuffer,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    /// The window was scanned (possibly finding nothing) and closed.
    Completed,
    /// Nothing could be visible yet; the watermark was left alone.
    Empty,
    /// The source is switched off; the window was closed without fetching.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub source: String,
    pub key: String,
    pub status: PassStatus,
    pub start: DateTime<Utc>,
    /// Final `finish`, after any shrinking by the batch guard.
    pub finish: DateTime<Utc>,
    pub processed: usize,
    pub deferred: usize,
    /// Whether a new watermark was written.
    pub advanced: bool,
}

/// Collaborators shared by one pass.
pub struct PassContext<'a> {
    pub store: &'a dyn WatermarkStore,
    pub buffer: VisibilityBuffer,
    pub now: DateTime<Utc>,
    pub metrics: &'a PassMetrics,
}

/// Executes passes for the sources of a registry.
///
/// Callers (a scheduler, a queue worker) must never run two passes for the
/// same source and arguments at once: both would read the same watermark and
/// the slower one would overwrite the faster one's progress.
pub struct PassRunner {
    registry: Arc<SourceRegistry>,
    store: Arc<dyn WatermarkStore>,
    settings: WindowSettings,
    metrics: PassMetrics,
}

impl PassRunner {
    pub fn new(
        registry: Arc<SourceRegistry>,
        store: Arc<dyn WatermarkStore>,
        settings: WindowSettings,
    ) -> Self {
        Self {
            registry,
            store,
            settings,
            metrics: PassMetrics::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: PassMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &PassMetrics {
        &self.metrics
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn run(&self, source: &str, args: &PassArgs) -> Result<PassReport, PassError> {
        self.run_at(source, args, Utc::now()).await
    }

    /// Run one pass as if the clock read `now`.
    pub async fn run_at(
        &self,
        source: &str,
        args: &PassArgs,
        now: DateTime<Utc>,
    ) -> Result<PassReport, PassError> {
        let registered = self.registry.get(source).inspect_err(|err| {
            error!(processor = %source, args = %args, error = %err, "record_change_worker");
            self.metrics.increment_failed();
        })?;

        let ctx = PassContext {
            store: self.store.as_ref(),
            buffer: self.settings.buffer,
            now,
            metrics: &self.metrics,
        };
        registered.run(source, args, &ctx).await
    }
}

/// One full pass: open, fetch, guard, process, close.
pub async fn execute<S: ChangeSource>(
    source: &S,
    name: &str,
    args: &PassArgs,
    ctx: &PassContext<'_>,
) -> Result<PassReport, PassError> {
    let settings = source.settings();
    let key = tracking_key(name, args);

    let window = match Window::new(key, settings.stale_age, ctx.buffer) {
        Ok(window) => window.open(ctx.store, ctx.now).await,
        Err(err) => Err(err),
    };
    let mut window = window.inspect_err(|err| {
        error!(processor = %name, args = %args, error = %err, "record_change_worker");
        ctx.metrics.increment_failed();
    })?;

    let window_start = window.start();
    info!(
        processor = %name,
        window_start = %window_start,
        window_finish = %window.finish(),
        args = %args,
        "record_change_worker start"
    );

    let outcome = scan(source, name, args, settings.limit, &mut window).await;
    let (status, processed, deferred) = outcome.inspect_err(|err| {
        error!(
            processor = %name,
            window_start = %window_start,
            args = %args,
            error = %err,
            "record_change_worker"
        );
        ctx.metrics.increment_failed();
    })?;

    info!(
        processor = %name,
        window_start = %window_start,
        args = %args,
        processed_count = processed,
        "record_change_worker finish"
    );

    let key = window.key().to_string();
    let finish = window.finish();
    let closed = window.close(ctx.store).await.inspect_err(|err| {
        error!(
            processor = %name,
            window_start = %window_start,
            args = %args,
            error = %err,
            "record_change_worker failed to persist watermark"
        );
        ctx.metrics.increment_failed();
    })?;

    match status {
        PassStatus::Completed => ctx.metrics.increment_completed(),
        PassStatus::Empty => ctx.metrics.increment_empty(),
        PassStatus::Disabled => ctx.metrics.increment_disabled(),
    }
    ctx.metrics.increment_processed(processed as u64);
    ctx.metrics.increment_deferred(deferred as u64);

    Ok(PassReport {
        source: name.to_string(),
        key,
        status,
        start: window_start,
        finish,
        processed,
        deferred,
        advanced: closed.advanced(),
    })
}

async fn scan<S: ChangeSource>(
    source: &S,
    name: &str,
    args: &PassArgs,
    limit: BatchLimit,
    window: &mut OpenWindow,
) -> Result<(PassStatus, usize, usize), PassError> {
    let Some(limit) = limit.get() else {
        return Ok((PassStatus::Disabled, 0, 0));
    };
    if window.is_empty() {
        return Ok((PassStatus::Empty, 0, 0));
    }

    let (from, to) = (window.start(), window.finish());
    let records = source
        .fetch(from, to, args)
        .await
        .map_err(|source_err| PassError::Fetch {
            source_name: name.to_string(),
            from,
            to,
            source: source_err,
        })?;

    let batch = BatchGuard::new(name, limit).apply(window, records, |record| {
        source.changed_at(record)
    })?;

    let processed = batch.records.len();
    if processed > 0 {
        source
            .process(batch.records, args)
            .await
            .map_err(|source_err| PassError::Process {
                source_name: name.to_string(),
                count: processed,
                source: source_err,
            })?;
    }

    Ok((PassStatus::Completed, processed, batch.deferred))
}
