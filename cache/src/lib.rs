//! Read-optimized cache for derived relationship views.
//!
//! Entries are advisory and disposable: they are populated lazily by a
//! read-through miss, deleted (never updated in place) when a mutation
//! changes the observable shape of a key, and expire on their own after the
//! TTL. Losing the whole cache costs store load, never correctness.
//!
//! `CacheStore` is the seam: the Redis backend serves production, the
//! in-memory backend serves tests and deployments without a Redis instance.

use async_trait::async_trait;
use std::time::Duration;

pub mod error;
pub mod keys;
pub mod memory;
pub mod redis_store;

pub use error::Error;
pub use memory::InMemoryCache;
pub use redis_store::RedisCache;

/// TTL applied to every relationship-view snapshot.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A string-keyed snapshot store with TTL expiry and explicit invalidation.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry. Expired or absent keys return `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store a serialized snapshot under `key` for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;

    /// Delete the entry. The key stays absent until the next read-through
    /// miss repopulates it.
    async fn invalidate(&self, key: &str) -> Result<(), Error>;
}
