use crate::domain_model::CacheKey;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// writes between full sweeps of expired entries
const SWEEP_EVERY: u64 = 256;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-local [`TokenCache`]. Expired entries read as absent, are
/// dropped on the next access to their key, and are swept from the whole
/// map every [`SWEEP_EVERY`] writes.
#[derive(Default)]
pub struct MemoryTokenCache {
    entries: DashMap<CacheKey, Entry>,
    writes: AtomicU64,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn sweep_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait::async_trait]
impl TokenCache for MemoryTokenCache {
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> Result<(), TokenCacheError> {
        self.entries.insert(
            key.clone(),
            Entry {
                value: value.to_owned(),
                expires_at: Instant::now() + ttl,
            },
        );
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.sweep_expired();
        }
        Ok(())
    }

    async fn get(&self, key: &CacheKey) -> Result<String, TokenCacheError> {
        let now = Instant::now();
        {
            // shard guard must be released before remove_if below
            if let Some(entry) = self.entries.get(key) {
                if entry.expires_at > now {
                    return Ok(entry.value.clone());
                }
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Err(TokenCacheError::NotFound)
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), TokenCacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::UserId;

    #[tokio::test]
    async fn set_get_delete() {
        let cache = MemoryTokenCache::new();
        let key = CacheKey::access(UserId::new_v4());

        assert!(matches!(cache.get(&key).await, Err(TokenCacheError::NotFound)));

        cache.set(&key, "t1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), "t1");

        cache.set(&key, "t2", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), "t2");

        cache.delete(&key).await.unwrap();
        assert!(matches!(cache.get(&key).await, Err(TokenCacheError::NotFound)));
        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn entries_expire_without_delete() {
        let cache = MemoryTokenCache::new();
        let key = CacheKey::refresh(UserId::new_v4());

        cache.set(&key, "t", Duration::from_millis(30)).await.unwrap();
        assert!(cache.get(&key).await.is_ok());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(matches!(cache.get(&key).await, Err(TokenCacheError::NotFound)));
        assert!(cache.entries.is_empty());
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries_of_other_keys() {
        let cache = MemoryTokenCache::new();
        for _ in 0..1000 {
            let key = CacheKey::access(UserId::new_v4());
            cache.set(&key, "stale", Duration::from_millis(1)).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        for _ in 0..SWEEP_EVERY {
            let key = CacheKey::refresh(UserId::new_v4());
            cache.set(&key, "fresh", Duration::from_secs(60)).await.unwrap();
        }

        assert!(cache.entries.len() <= SWEEP_EVERY as usize);
        assert!(cache.entries.iter().all(|entry| entry.value == "fresh"));
    }

    #[tokio::test]
    async fn kinds_do_not_collide() {
        let cache = MemoryTokenCache::new();
        let subject = UserId::new_v4();
        let ttl = Duration::from_secs(60);

        cache.set(&CacheKey::access(subject), "a", ttl).await.unwrap();
        cache.set(&CacheKey::refresh(subject), "r", ttl).await.unwrap();

        assert_eq!(cache.get(&CacheKey::access(subject)).await.unwrap(), "a");
        assert_eq!(cache.get(&CacheKey::refresh(subject)).await.unwrap(), "r");
    }
}
