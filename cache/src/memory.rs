use crate::error::Error;
use crate::CacheStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local cache backend with lazy TTL expiry.
///
/// Used by tests and by deployments that run without a Redis instance.
/// Expired entries are dropped on the read that finds them; there is no
/// background sweeper.
pub struct InMemoryCache {
    entries: DashMap<String, Entry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.value.clone()));
            }
            drop(entry); // Release lock before removal
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }
}
