use crate::{
    error::StoreError,
    state::{WatermarkStore, codec},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, RedisError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct RedisWatermarkStore {
    /// Prefix for all keys used by this store
    key_prefix: String,
    client: redis::aio::ConnectionManager,
}

impl RedisWatermarkStore {
    /// Connect via redis-rs using async and ConnectionManager.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        let key_prefix = key_prefix.into();

        info!(prefix = %key_prefix, "Connected redis watermark store");
        Ok(Self::with_manager(manager, key_prefix))
    }

    pub fn with_manager(
        client: redis::aio::ConnectionManager,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            client,
        }
    }

    fn prefixed(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

#[async_trait]
impl WatermarkStore for RedisWatermarkStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let mut conn = self.client.clone();
        let raw: Option<String> = conn.get(self.prefixed(key)).await?;

        match raw {
            Some(raw) => codec::decode(key, &raw),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), StoreError> {
        let mut conn = self.client.clone();
        let encoded = codec::encode(&value);
        let _: () = conn.set(self.prefixed(key), encoded.as_str()).await?;

        debug!(key = %key, watermark = %encoded, "Saved watermark");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis_watermark_store"
    }
}

#[cfg(all(test, feature = "redis-tests"))]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    #[tokio::test]
    async fn round_trips_against_local_redis() {
        let store = RedisWatermarkStore::connect(REDIS_URL, "watermark-test")
            .await
            .unwrap();
        let mark = Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap()
            + TimeDelta::microseconds(7);

        store.set("orders-processed-up-to", mark).await.unwrap();
        assert_eq!(
            store.get("orders-processed-up-to").await.unwrap(),
            Some(mark)
        );
        assert_eq!(store.get("never-written").await.unwrap(), None);
    }
}
