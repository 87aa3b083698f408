#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use engine_config::settings::SourceSettings;
use engine_processing::source::{ChangeSource, SourceError};
use model::pass::PassArgs;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

pub mod utils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u64,
    pub changed_at: DateTime<Utc>,
}

/// A change source backed by an in-memory table.
///
/// Records every batch it is asked to process, and can be told to fail
/// fetching or processing to exercise retries.
pub struct FixtureSource {
    settings: SourceSettings,
    rows: Mutex<Vec<Row>>,
    batches: Mutex<Vec<Vec<u64>>>,
    fetches: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_process: AtomicBool,
}

impl FixtureSource {
    pub fn new(settings: SourceSettings) -> Self {
        Self {
            settings,
            rows: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            fail_fetch: AtomicBool::new(false),
            fail_process: AtomicBool::new(false),
        }
    }

    /// Upsert a row, the way an `UPDATE ... SET updated_at = now()` would.
    pub fn touch(&self, id: u64, changed_at: DateTime<Utc>) {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| row.id != id);
        rows.push(Row { id, changed_at });
    }

    pub fn touch_many(&self, changes: impl IntoIterator<Item = (u64, DateTime<Utc>)>) {
        for (id, changed_at) in changes {
            self.touch(id, changed_at);
        }
    }

    pub fn batches(&self) -> Vec<Vec<u64>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn processed_ids(&self) -> Vec<u64> {
        self.batches().into_iter().flatten().collect()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_process(&self, fail: bool) {
        self.fail_process.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChangeSource for FixtureSource {
    type Record = Row;

    fn settings(&self) -> SourceSettings {
        self.settings
    }

    async fn fetch(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _args: &PassArgs,
    ) -> Result<Vec<Row>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err("connection reset by peer".into());
        }

        let mut rows: Vec<Row> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.changed_at >= from && row.changed_at < to)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.changed_at, row.id));
        Ok(rows)
    }

    fn changed_at(&self, record: &Row) -> DateTime<Utc> {
        record.changed_at
    }

    async fn process(&self, records: Vec<Row>, _args: &PassArgs) -> Result<(), SourceError> {
        if self.fail_process.load(Ordering::SeqCst) {
            return Err("downstream unavailable".into());
        }
        self.batches
            .lock()
            .unwrap()
            .push(records.into_iter().map(|row| row.id).collect());
        Ok(())
    }
}
