use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Watermark stored under '{key}' is not valid UTF-8")]
    Utf8 { key: String },

    #[error("Failed to parse watermark '{value}' stored under '{key}': {source}")]
    Decode {
        key: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
