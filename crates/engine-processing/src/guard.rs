use crate::{error::PassError, window::OpenWindow};
use chrono::{DateTime, Utc};
use std::num::NonZeroUsize;
use tracing::warn;

/// Keeps a pass's batch strictly below the source's limit.
///
/// When a fetch reaches the limit, the window's `finish` is pulled back to the
/// change instant of the last record the limit admits, and every record at or
/// after that instant is dropped. The dropped records lie at or after the new
/// watermark, so the next pass fetches them again.
pub struct BatchGuard<'a> {
    source_name: &'a str,
    limit: NonZeroUsize,
}

#[derive(Debug)]
pub struct GuardedBatch<R> {
    pub records: Vec<R>,
    /// Records dropped and left for the next pass.
    pub deferred: usize,
}

impl<'a> BatchGuard<'a> {
    pub fn new(source_name: &'a str, limit: NonZeroUsize) -> Self {
        Self { source_name, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// `records` must be ascending by `changed_at`.
    ///
    /// Fails with [`PassError::MaxCountExceeded`] when the first `limit`
    /// records share one change instant: no `finish` can split them below
    /// the limit, so the window could never move forward.
    pub fn apply<R, F>(
        &self,
        window: &mut OpenWindow,
        mut records: Vec<R>,
        changed_at: F,
    ) -> Result<GuardedBatch<R>, PassError>
    where
        F: Fn(&R) -> DateTime<Utc>,
    {
        debug_assert!(
            records
                .windows(2)
                .all(|pair| changed_at(&pair[0]) <= changed_at(&pair[1])),
            "records must be ascending by changed_at"
        );

        let limit = self.limit.get();
        let cutoff = match records.get(limit - 1) {
            Some(record) => changed_at(record),
            None => {
                return Ok(GuardedBatch {
                    records,
                    deferred: 0,
                });
            }
        };

        window.shrink_to(cutoff);
        let finish = window.finish();
        let keep = records
            .iter()
            .position(|record| changed_at(record) >= finish)
            .unwrap_or(records.len());

        if keep == 0 {
            return Err(PassError::MaxCountExceeded {
                source_name: self.source_name.to_string(),
                limit,
                start: window.start(),
                finish,
            });
        }

        let deferred = records.len() - keep;
        records.truncate(keep);

        warn!(
            processor = %self.source_name,
            limit,
            kept = keep,
            deferred,
            window_finish = %finish,
            "Batch reached limit, shrinking window"
        );

        Ok(GuardedBatch { records, deferred })
    }
}
