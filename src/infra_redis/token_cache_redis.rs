use crate::domain_model::CacheKey;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// [`TokenCache`] over plain `SET EX` / `GET` / `DEL`, each atomic per key.
/// Expiry is left to redis.
pub struct RedisTokenCache {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisTokenCache {
    /// An empty `prefix` keeps keys exactly `<kind>:<subject>`.
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisTokenCache {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &CacheKey) -> String {
        namespaced(&self.prefix, key)
    }
}

fn namespaced(prefix: &str, key: &CacheKey) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", prefix, key)
    }
}

fn unavailable(e: redis::RedisError) -> TokenCacheError {
    TokenCacheError::Unavailable(e.to_string())
}

#[async_trait::async_trait]
impl TokenCache for RedisTokenCache {
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), TokenCacheError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        // EX 0 is rejected by redis
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(&key, value, ttl_secs)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn get(&self, key: &CacheKey) -> Result<String, TokenCacheError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn.get(&key).await.map_err(unavailable)?;
        val.ok_or(TokenCacheError::NotFound)
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), TokenCacheError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await.map_err(unavailable)?;
        Ok(())
    }
}
