use crate::application_impl::{JwtConfig, JwtHs256Codec, RealSessionManager};
use crate::application_port::*;
use crate::domain_model::CacheKey;
use crate::domain_port::{TokenCache, TokenCacheError};
use crate::infra_memory::MemoryTokenCache;
use std::sync::Arc;
use std::time::Duration;

/// Reversible stand-in so tests skip argon2.
pub struct PlainHasher;

#[async_trait::async_trait]
impl CredentialHasher for PlainHasher {
    async fn hash_password(&self, password: &str) -> Result<String, UserError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, UserError> {
        Ok(hash == format!("plain:{password}"))
    }
}

pub fn memory_sessions() -> Arc<RealSessionManager> {
    let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
        issuer: "usergate.test".to_string(),
        signing_key: b"test-secret".to_vec(),
    }));
    Arc::new(RealSessionManager::new(
        codec,
        Arc::new(MemoryTokenCache::new()),
        SessionConfig::default(),
    ))
}

/// Cache whose backend is unreachable for every call.
pub struct DownTokenCache;

#[async_trait::async_trait]
impl TokenCache for DownTokenCache {
    async fn set(&self, _: &CacheKey, _: &str, _: Duration) -> Result<(), TokenCacheError> {
        Err(TokenCacheError::Unavailable("down".to_string()))
    }

    async fn get(&self, _: &CacheKey) -> Result<String, TokenCacheError> {
        Err(TokenCacheError::Unavailable("down".to_string()))
    }

    async fn delete(&self, _: &CacheKey) -> Result<(), TokenCacheError> {
        Err(TokenCacheError::Unavailable("down".to_string()))
    }
}
