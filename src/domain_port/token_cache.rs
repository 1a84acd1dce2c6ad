use crate::domain_model::CacheKey;
use std::time::Duration;

/// Expiring key-value store holding the one currently valid token per
/// `<kind>:<subject>`. Each call is atomic for its key, and entries must
/// disappear on their own once `ttl` has elapsed.
#[async_trait::async_trait]
pub trait TokenCache: Send + Sync {
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), TokenCacheError>;

    /// Fails with [`TokenCacheError::NotFound`] for absent or expired keys.
    async fn get(&self, key: &CacheKey) -> Result<String, TokenCacheError>;

    /// Deleting an absent key succeeds.
    async fn delete(&self, key: &CacheKey) -> Result<(), TokenCacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenCacheError {
    #[error("cache entry not found")]
    NotFound,
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}
