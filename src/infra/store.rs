use anyhow::Result;
use redis::{aio::ConnectionManager, AsyncCommands};

use super::config::Config;

/// Failure kinds of the remote key-value store, tagged so callers match on
/// kind instead of comparing against a library sentinel.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("key not found")]
    NotFound,
    #[error("stored value {0:?} is not an integer")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The three operations the counter protocol needs from the store.
#[async_trait::async_trait]
pub(crate) trait CounterStore: Send + Sync {
    /// Current integer value of `key`.
    async fn get(&self, key: &str) -> Result<i64, StoreError>;

    /// Creates `key` with `value` only if it does not exist yet. Returns
    /// whether this call created it; `false` means someone else already did.
    /// Must never overwrite an existing value, or concurrent initialization
    /// could reset a counter that has already been incremented.
    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool, StoreError>;

    /// Atomically adds one to `key` and returns the new value.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;
}

/// Redis-backed store. `ConnectionManager` multiplexes a single connection
/// and is safe to share across request tasks.
#[derive(Clone)]
pub(crate) struct RedisStore {
    conn: ConnectionManager,
}

pub(crate) async fn connect(config: &Config) -> Result<RedisStore> {
    let client = redis::Client::open(config.redis_url())?;
    let conn = ConnectionManager::new(client).await?;

    Ok(RedisStore { conn })
}

#[async_trait::async_trait]
impl CounterStore for RedisStore {
    async fn get(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await.map_err(unavailable)?;

        match raw {
            None => Err(StoreError::NotFound),
            Some(raw) => raw.parse().map_err(|_| StoreError::Corrupt(raw)),
        }
    }

    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let created: bool = conn.set_nx(key, value).await.map_err(unavailable)?;

        Ok(created)
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await.map_err(unavailable)?;

        Ok(value)
    }
}

fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
