//! Component H (spec §4.H): the cache layer.
//!
//! Treated throughout as "an opaque get/set/invalidate-by-prefix service"
//! (spec §1) — callers never reason about what backs it. [`redis_client`]
//! talks to a real Redis instance; [`memory_fallback`] is a bounded
//! in-process store used when Redis is unreachable; [`tiered`] composes
//! the two so a cache outage degrades hit rate instead of availability.
//!
//! Cache operations are best-effort: every failure is logged and treated
//! as a miss/no-op (spec §7), never propagated as a request error.

pub mod memory_fallback;
pub mod redis_client;
pub mod tiered;

pub use memory_fallback::MemoryFallback;
pub use redis_client::RedisCache;
pub use tiered::TieredCache;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
