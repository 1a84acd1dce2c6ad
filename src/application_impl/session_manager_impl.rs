use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Issues, validates and revokes token pairs.
///
/// The signature only proves a token is ours and unexpired. Whether it is
/// still *the* token for its subject is decided by the cache: every check
/// compares the presented string with the cached one, so a newer issue or a
/// revoke takes effect immediately. Holds no mutable state of its own.
#[derive(Clone)]
pub struct RealSessionManager {
    codec: Arc<dyn TokenCodec>,
    cache: Arc<dyn TokenCache>,
    cfg: SessionConfig,
}

impl RealSessionManager {
    pub fn new(codec: Arc<dyn TokenCodec>, cache: Arc<dyn TokenCache>, cfg: SessionConfig) -> Self {
        RealSessionManager { codec, cache, cfg }
    }

    fn ttl_of(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.cfg.access_ttl,
            TokenKind::Refresh => self.cfg.refresh_ttl,
        }
    }

    async fn check(&self, token: &str, expected: TokenKind) -> Result<UserId, TokenError> {
        let claims = self.codec.verify(token)?;
        if claims.kind != expected {
            return Err(TokenError::KindMismatch {
                expected,
                actual: claims.kind,
            });
        }
        let subject: UserId = claims.sub.parse().map_err(|_| TokenError::Malformed)?;

        let current = self
            .cache
            .get(&CacheKey {
                kind: expected,
                subject,
            })
            .await?;
        if current != token {
            return Err(TokenError::Superseded);
        }
        Ok(subject)
    }

    async fn issue_and_store(&self, subject: UserId, kind: TokenKind) -> Result<String, TokenError> {
        let ttl = self.ttl_of(kind);
        let token = self.codec.issue(subject, kind, ttl)?;
        self.cache
            .set(&CacheKey { kind, subject }, &token, ttl)
            .await?;
        Ok(token)
    }

    async fn issue_pair(&self, subject: UserId) -> Result<TokenPair, SessionError> {
        let access = self.issue_and_store(subject, TokenKind::Access).await?;
        let refresh = match self.issue_and_store(subject, TokenKind::Refresh).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%subject, error = %e, "refresh token write failed, login aborted");
                if let Err(del) = self.cache.delete(&CacheKey::access(subject)).await {
                    warn!(%subject, error = %del, "could not drop half-issued access token");
                }
                return Err(e.into());
            }
        };
        debug!(%subject, "token pair issued");
        Ok(TokenPair {
            access_token: AccessToken(access),
            refresh_token: RefreshToken(refresh),
        })
    }

    async fn exchange(&self, refresh_token: String) -> Result<AccessToken, SessionError> {
        let subject = self
            .check(&refresh_token, TokenKind::Refresh)
            .await
            .map_err(|e| rejected("refresh", e))?;
        let access = self.issue_and_store(subject, TokenKind::Access).await?;
        debug!(%subject, "access token refreshed");
        Ok(AccessToken(access))
    }

    async fn revoke_all(&self, subject: UserId) -> Result<(), SessionError> {
        let access = self.cache.delete(&CacheKey::access(subject)).await;
        let refresh = self.cache.delete(&CacheKey::refresh(subject)).await;
        access.and(refresh).map_err(TokenError::from)?;
        debug!(%subject, "tokens revoked");
        Ok(())
    }
}

fn rejected(what: &str, err: TokenError) -> SessionError {
    debug!(reason = %err, "{what} token rejected");
    SessionError::from(err)
}

/// Runs cache writes on their own task so a dropped request cannot stop a
/// write sequence halfway.
async fn run_detached<F, T>(fut: F) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(fut)
        .await
        .map_err(|e| SessionError::Internal(e.to_string()))?
}

#[async_trait::async_trait]
impl SessionManager for RealSessionManager {
    async fn login(&self, subject: UserId) -> Result<TokenPair, SessionError> {
        let this = self.clone();
        run_detached(async move { this.issue_pair(subject).await }).await
    }

    async fn validate_access(&self, token: &str) -> Result<UserId, SessionError> {
        self.check(token, TokenKind::Access)
            .await
            .map_err(|e| rejected("access", e))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, SessionError> {
        let this = self.clone();
        let refresh_token = refresh_token.to_owned();
        run_detached(async move { this.exchange(refresh_token).await }).await
    }

    async fn revoke(&self, subject: UserId) -> Result<(), SessionError> {
        let this = self.clone();
        run_detached(async move { this.revoke_all(subject).await }).await
    }
}
