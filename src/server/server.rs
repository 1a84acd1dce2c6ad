use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::{Cache, Settings, Store};
use sqlx::MySqlPool;
use std::sync::Arc;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub session_manager: Arc<dyn SessionManager>,
    pool: Option<MySqlPool>,
}

/// User repository for the configured store backend. The pool is returned
/// so the owner can close it on shutdown.
pub async fn connect_user_repo(
    store: &Store,
) -> anyhow::Result<(Arc<dyn UserRepo>, Option<MySqlPool>)> {
    match store.backend.as_str() {
        "memory" => Ok((Arc::new(MemoryUserRepo::new()), None)),
        "mysql" => {
            let pool = MySqlPool::connect(&store.url).await?;
            info!("connected to mysql");
            Ok((Arc::new(MySqlUserRepo::new(pool.clone())), Some(pool)))
        }
        other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
    }
}

pub async fn connect_token_cache(cache: &Cache) -> anyhow::Result<Arc<dyn TokenCache>> {
    match cache.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryTokenCache::new())),
        "redis" => {
            let redis_client = redis::Client::open(cache.url.as_str())?;
            let redis_manager = redis_client.get_connection_manager().await?;
            info!("connected to redis");
            Ok(Arc::new(RedisTokenCache::new(
                redis_manager,
                cache.prefix.clone(),
            )))
        }
        other => Err(anyhow::anyhow!("Unknown cache backend: {}", other)),
    }
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: settings.jwt.issuer.clone(),
            signing_key: settings.jwt.signing_key()?,
        }));
        let token_cache = connect_token_cache(&settings.cache).await?;
        let (user_repo, pool) = connect_user_repo(&settings.store).await?;

        let session_manager: Arc<dyn SessionManager> = Arc::new(RealSessionManager::new(
            token_codec,
            token_cache,
            SessionConfig {
                access_ttl: settings.jwt.access_ttl(),
                refresh_ttl: settings.jwt.refresh_ttl(),
            },
        ));

        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher);

        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            user_repo.clone(),
            credential_hasher.clone(),
        ));

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo,
            user_service.clone(),
            credential_hasher,
            session_manager.clone(),
        ));

        info!(
            cache = %settings.cache.backend,
            store = %settings.store.backend,
            "server started"
        );

        Ok(Self {
            auth_service,
            user_service,
            session_manager,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
