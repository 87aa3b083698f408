//! Scan windows over change timestamps.
//!
//! A window is the half-open interval `[start, finish)` one pass scans. It is
//! created per pass and moves through three states, each consuming the last:
//!
//! - [`Window`]: key and bounds configured, nothing read yet.
//! - [`OpenWindow`]: bounds computed from the clock and the stored watermark.
//!   `finish` may still be pulled back by the batch guard.
//! - [`ClosedWindow`]: `finish` committed as the new watermark, or nothing
//!   written if the window was empty.
//!
//! Closing is the only operation that writes the watermark. A pass that fails
//! between open and close leaves it untouched and the next pass recomputes
//! the same interval.

use crate::error::PassError;
use chrono::{DateTime, Utc};
use engine_core::state::WatermarkStore;
use model::time::{Lookback, VisibilityBuffer};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Window {
    key: String,
    max_lookback: Lookback,
    buffer: VisibilityBuffer,
}

impl Window {
    pub fn new(
        key: impl Into<String>,
        max_lookback: Lookback,
        buffer: VisibilityBuffer,
    ) -> Result<Self, PassError> {
        let key = key.into();
        if !max_lookback.is_valid() {
            return Err(PassError::InvalidConfiguration(format!(
                "max lookback for '{key}' must be positive, got {max_lookback}"
            )));
        }

        Ok(Self {
            key,
            max_lookback,
            buffer,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Compute the bounds for a pass starting at `now`.
    ///
    /// `start` is the latest of the Unix epoch, `now - max_lookback` and the
    /// stored watermark. `finish` trails `now` by the visibility buffer.
    pub async fn open(
        self,
        store: &dyn WatermarkStore,
        now: DateTime<Utc>,
    ) -> Result<OpenWindow, PassError> {
        let finish = self.buffer.finish_for(now);
        let watermark = store.get(&self.key).await?;

        let start = [self.max_lookback.earliest_start(now), watermark]
            .into_iter()
            .flatten()
            .fold(DateTime::<Utc>::UNIX_EPOCH, |acc, bound| acc.max(bound));

        debug!(
            key = %self.key,
            start = %start,
            finish = %finish,
            watermark = ?watermark,
            lookback = %self.max_lookback,
            "Opened window"
        );

        Ok(OpenWindow {
            key: self.key,
            start,
            finish,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindow {
    key: String,
    start: DateTime<Utc>,
    finish: DateTime<Utc>,
}

impl OpenWindow {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn finish(&self) -> DateTime<Utc> {
        self.finish
    }

    /// Nothing new can be visible yet.
    pub fn is_empty(&self) -> bool {
        self.start >= self.finish
    }

    /// Pull `finish` back to `at`. Never moves it forward, since everything
    /// past the original `finish` may not be visible yet.
    pub fn shrink_to(&mut self, at: DateTime<Utc>) {
        self.finish = self.finish.min(at);
    }

    /// Commit `finish` as the watermark. An empty window writes nothing.
    pub async fn close(self, store: &dyn WatermarkStore) -> Result<ClosedWindow, PassError> {
        if self.is_empty() {
            return Ok(ClosedWindow {
                key: self.key,
                processed_up_to: self.start,
                advanced: false,
            });
        }

        store.set(&self.key, self.finish).await?;
        debug!(key = %self.key, watermark = %self.finish, "Closed window");

        Ok(ClosedWindow {
            key: self.key,
            processed_up_to: self.finish,
            advanced: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedWindow {
    key: String,
    processed_up_to: DateTime<Utc>,
    advanced: bool,
}

impl ClosedWindow {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The window's `start` after closing: everything before it is done.
    pub fn processed_up_to(&self) -> DateTime<Utc> {
        self.processed_up_to
    }

    /// Whether closing wrote a new watermark.
    pub fn advanced(&self) -> bool {
        self.advanced
    }
}
