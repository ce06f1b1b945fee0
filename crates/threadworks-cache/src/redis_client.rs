//! Redis-backed cache backend (spec §4.H): the primary tier.

use std::time::Duration;

use redis::AsyncCommands;

use crate::CacheError;

#[derive(Clone)]
pub struct RedisCache {
    manager: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis and build a cloneable, auto-reconnecting manager.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the initial connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }

    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the GET fails.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the SETEX fails.
    pub async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    /// Delete every key whose name starts with `prefix`, scanning in
    /// batches so a large keyspace doesn't block Redis with a single
    /// `KEYS` call.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the scan or delete fails.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut conn = self.manager.clone();
        let pattern = format!("{prefix}*");
        let mut deleted = 0u64;
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await?;
                deleted += removed;
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(deleted)
    }
}
