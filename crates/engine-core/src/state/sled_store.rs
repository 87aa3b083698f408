use crate::{
    error::StoreError,
    state::{WatermarkStore, codec},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

pub struct SledWatermarkStore {
    db: sled::Db,
}

impl SledWatermarkStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    /// Helper to keep watermark keys apart from anything else in the tree
    #[inline]
    fn wm_key(key: &str) -> String {
        format!("wm:{}", key)
    }
}

#[async_trait]
impl WatermarkStore for SledWatermarkStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.db.get(Self::wm_key(key))? {
            Some(bytes) => codec::decode_bytes(key, &bytes),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), StoreError> {
        let encoded = codec::encode(&value);
        self.db.insert(Self::wm_key(key), encoded.as_bytes())?;

        // The watermark must survive a crash right after the pass reports success
        self.db.flush_async().await?;
        debug!(key = %key, watermark = %encoded, "Saved watermark");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sled_watermark_store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use tempfile::tempdir;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let dir = tempdir().unwrap();
        let store = SledWatermarkStore::open(dir.path()).unwrap();

        assert_eq!(store.get("orders-processed-up-to").await.unwrap(), None);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempdir().unwrap();
        let mark = ts(-60) + TimeDelta::microseconds(42);

        {
            let store = SledWatermarkStore::open(dir.path()).unwrap();
            store.set("orders-processed-up-to", mark).await.unwrap();
        }

        let store = SledWatermarkStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("orders-processed-up-to").await.unwrap(),
            Some(mark)
        );
    }

    #[tokio::test]
    async fn last_write_wins() {
        let dir = tempdir().unwrap();
        let store = SledWatermarkStore::open(dir.path()).unwrap();

        store.set("k", ts(10)).await.unwrap();
        store.set("k", ts(5)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(ts(5)));
    }

    #[tokio::test]
    async fn stores_text_under_prefixed_key() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let store = SledWatermarkStore::from_db(db.clone());

        store.set("k", ts(0)).await.unwrap();
        let raw = db.get("wm:k").unwrap().unwrap();
        assert_eq!(&*raw, b"2024-05-01T12:00:00.000000Z");
    }

    #[tokio::test]
    async fn corrupt_value_is_an_error() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        db.insert("wm:k", "not a time").unwrap();

        let store = SledWatermarkStore::from_db(db);
        assert!(matches!(
            store.get("k").await,
            Err(StoreError::Decode { .. })
        ));
    }
}
