use crate::error::Error;
use crate::CacheStore;
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use std::time::Duration;

/// Redis-backed cache. Snapshots are plain string values with a server-side
/// TTL, so restarting this process loses nothing and restarting Redis loses
/// only cache warmth.
pub struct RedisCache {
    client: RedisClient,
}

impl RedisCache {
    pub fn new(url: &str) -> Result<Self, Error> {
        let client = RedisClient::open(url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
