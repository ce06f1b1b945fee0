//! Two-tier cache (spec §4.H): Redis as the primary tier, the in-process
//! [`MemoryFallback`] as the secondary. A Redis failure degrades hit rate,
//! never request success — every Redis error is logged and treated as a
//! miss, then retried against the memory tier (spec §7: "cache errors are
//! always swallowed, logged, treated as miss/no-op").

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{MemoryFallback, RedisCache};

pub struct TieredCache {
    redis: Option<RedisCache>,
    memory: MemoryFallback,
}

impl TieredCache {
    #[must_use]
    pub fn new(redis: Option<RedisCache>, memory_max_entries: usize) -> Self {
        Self { redis, memory: MemoryFallback::new(memory_max_entries) }
    }

    /// Connect to Redis and compose it with an in-process fallback. If the
    /// Redis connection fails, logs a warning and runs memory-only — the
    /// cache layer is never allowed to fail startup (spec §7).
    #[must_use]
    pub async fn connect_or_memory_only(redis_url: &str, memory_max_entries: usize) -> Self {
        match RedisCache::connect(redis_url).await {
            Ok(redis) => Self::new(Some(redis), memory_max_entries),
            Err(error) => {
                tracing::warn!(%error, "cache: redis unreachable at startup, running memory-only");
                Self::new(None, memory_max_entries)
            }
        }
    }

    /// Fetch and deserialize a cached value. Any backend error (Redis
    /// down, malformed JSON) is logged and treated as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(redis) = &self.redis {
            match redis.get_raw(key).await {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(value) => return Some(value),
                    Err(error) => {
                        tracing::warn!(%error, key, "cache: malformed redis payload, treating as miss");
                    }
                },
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(%error, key, "cache: redis get failed, falling back to memory tier");
                }
            }
        }

        let raw = self.memory.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%error, key, "cache: malformed memory payload, treating as miss");
                None
            }
        }
    }

    /// Serialize and store a value in both tiers. Failures are logged and
    /// swallowed — a failed write never fails the request it accelerates.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%error, key, "cache: failed to serialize value, skipping write");
                return;
            }
        };

        if let Some(redis) = &self.redis {
            if let Err(error) = redis.set_raw(key, &raw, ttl).await {
                tracing::warn!(%error, key, "cache: redis set failed");
            }
        }
        self.memory.set_raw(key, &raw, ttl);
    }

    /// Invalidate every key under `prefix` in both tiers. Used by the
    /// admin cache-invalidate trigger (spec §6).
    pub async fn invalidate_prefix(&self, prefix: &str) -> u64 {
        let mut removed = self.memory.delete_prefix(prefix);
        if let Some(redis) = &self.redis {
            match redis.delete_prefix(prefix).await {
                Ok(n) => removed += n,
                Err(error) => {
                    tracing::warn!(%error, prefix, "cache: redis prefix invalidation failed");
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        total: i64,
    }

    #[tokio::test]
    async fn memory_only_set_then_get_round_trips() {
        let cache = TieredCache::new(None, 10);
        cache.set("count:abc", &Payload { total: 42 }, Duration::from_secs(60)).await;
        let value: Option<Payload> = cache.get("count:abc").await;
        assert_eq!(value, Some(Payload { total: 42 }));
    }

    #[tokio::test]
    async fn memory_only_get_is_none_for_unknown_key() {
        let cache = TieredCache::new(None, 10);
        let value: Option<Payload> = cache.get("missing").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn memory_only_invalidate_prefix_clears_matching_keys() {
        let cache = TieredCache::new(None, 10);
        cache.set("listing:1", &Payload { total: 1 }, Duration::from_secs(60)).await;
        cache.set("listing:2", &Payload { total: 2 }, Duration::from_secs(60)).await;
        cache.set("detail:1", &Payload { total: 3 }, Duration::from_secs(60)).await;

        let removed = cache.invalidate_prefix("listing:").await;
        assert_eq!(removed, 2);

        let detail: Option<Payload> = cache.get("detail:1").await;
        assert_eq!(detail, Some(Payload { total: 3 }));
    }
}
