use async_trait::async_trait;
use chrono::{DateTime, Utc};
use engine_config::settings::SourceSettings;
use model::pass::PassArgs;
use std::sync::Arc;

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// A record type whose changes are polled incrementally.
///
/// The core never looks inside a record; it only asks the source when the
/// record last changed.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    type Record: Send;

    fn settings(&self) -> SourceSettings;

    /// Records with `from <= changed_at < to`, ascending by `changed_at`.
    async fn fetch(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        args: &PassArgs,
    ) -> Result<Vec<Self::Record>, SourceError>;

    fn changed_at(&self, record: &Self::Record) -> DateTime<Utc>;

    /// Apply side effects for a batch. Must be idempotent: a failed pass
    /// hands the same records over again.
    async fn process(&self, records: Vec<Self::Record>, args: &PassArgs)
    -> Result<(), SourceError>;
}

#[async_trait]
impl<T: ChangeSource> ChangeSource for Arc<T> {
    type Record = T::Record;

    fn settings(&self) -> SourceSettings {
        (**self).settings()
    }

    async fn fetch(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        args: &PassArgs,
    ) -> Result<Vec<Self::Record>, SourceError> {
        (**self).fetch(from, to, args).await
    }

    fn changed_at(&self, record: &Self::Record) -> DateTime<Utc> {
        (**self).changed_at(record)
    }

    async fn process(
        &self,
        records: Vec<Self::Record>,
        args: &PassArgs,
    ) -> Result<(), SourceError> {
        (**self).process(records, args).await
    }
}
