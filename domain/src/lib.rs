//! Business operations of the relationship graph: the friend-request state
//! machine, follow/unfollow mutations, and the cached read paths.
//!
//! This crate re-exports entity modules so that consumers (the web layer)
//! do not need to depend on `entity_api` directly. Each operation validates
//! against the store, persists, and only then touches the advisory cache and
//! publishes events; cache and fan-out failures never roll back a committed
//! mutation.

pub use entity_api::{follows, friend_requests, request_status, users, Id};

pub mod error;
pub mod follow;
pub mod friend_request;
pub mod user;

use cache::CacheStore;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a cached snapshot. Backend failures and undecodable entries are
/// treated as a miss so the caller falls through to the store.
pub(crate) async fn cache_fetch<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {key}: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Cache read for {key} failed, falling through to store: {e}");
            None
        }
    }
}

/// Store a snapshot with the standard TTL. Failures are logged and absorbed.
pub(crate) async fn cache_store<T: Serialize>(cache: &dyn CacheStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(e) = cache.set(key, &json, cache::DEFAULT_TTL).await {
                warn!("Cache write for {key} failed: {e}");
            }
        }
        Err(e) => warn!("Failed to serialize cache entry {key}: {e}"),
    }
}

/// Invalidate a key after its underlying data changed. A failure here means
/// the stale entry survives until its TTL, which is the accepted bound.
pub(crate) async fn cache_evict(cache: &dyn CacheStore, key: &str) {
    if let Err(e) = cache.invalidate(key).await {
        warn!("Cache invalidation for {key} failed, entry stale until TTL: {e}");
    }
}
