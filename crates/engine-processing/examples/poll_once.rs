//! Runs a few passes of an in-memory change source against a sled store.
//!
//! `RUST_LOG=debug cargo run -p engine-processing --example poll_once`
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use engine_config::settings::{SourceSettings, WindowSettings};
use engine_core::state::{WatermarkStore, sled_store::SledWatermarkStore};
use engine_processing::{
    pass::PassRunner,
    registry::SourceRegistry,
    source::{ChangeSource, SourceError},
};
use model::{
    pass::{BatchLimit, PassArgs},
    time::Lookback,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Order {
    id: u32,
    updated_at: DateTime<Utc>,
}

struct OrderFeed {
    orders: Vec<Order>,
}

#[async_trait]
impl ChangeSource for OrderFeed {
    type Record = (u32, DateTime<Utc>);

    fn settings(&self) -> SourceSettings {
        SourceSettings {
            limit: BatchLimit::max(5).unwrap_or(BatchLimit::Disabled),
            stale_age: Lookback::from_secs(24 * 3600),
        }
    }

    async fn fetch(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _args: &PassArgs,
    ) -> Result<Vec<Self::Record>, SourceError> {
        Ok(self
            .orders
            .iter()
            .filter(|order| order.updated_at >= from && order.updated_at < to)
            .map(|order| (order.id, order.updated_at))
            .collect())
    }

    fn changed_at(&self, record: &Self::Record) -> DateTime<Utc> {
        record.1
    }

    async fn process(&self, records: Vec<Self::Record>, args: &PassArgs) -> Result<(), SourceError> {
        for (id, updated_at) in records {
            println!("[{args}] order {id} changed at {updated_at}");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let now = Utc::now();
    let orders = (0..12u32)
        .map(|id| Order {
            id,
            updated_at: now - TimeDelta::minutes(90) + TimeDelta::minutes(i64::from(id) * 5),
        })
        .collect();

    let mut registry = SourceRegistry::new();
    registry.register("order_feed", OrderFeed { orders })?;

    let dir = tempfile::tempdir()?;
    let store: Arc<dyn WatermarkStore> = Arc::new(SledWatermarkStore::open(dir.path())?);
    let runner = PassRunner::new(Arc::new(registry), store, WindowSettings::from_env()?);

    let args = PassArgs::new().with("region", "eu");
    for _ in 0..4 {
        let report = runner.run("order_feed", &args).await?;
        println!("{}", serde_json::to_string(&report)?);
    }

    println!("{:?}", runner.metrics().snapshot());
    Ok(())
}
