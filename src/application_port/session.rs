use crate::domain_model::*;
use crate::domain_port::TokenCacheError;
use std::time::Duration;

/// Why a token was refused. Only used for branching and debug logs;
/// callers see [`SessionError::Unauthorized`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("expected {expected} token, got {actual}")]
    KindMismatch {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("token superseded")]
    Superseded,
    #[error("no live token for subject")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<TokenCacheError> for TokenError {
    fn from(err: TokenCacheError) -> Self {
        match err {
            TokenCacheError::NotFound => TokenError::NotFound,
            TokenCacheError::Unavailable(e) => TokenError::StoreUnavailable(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("token store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for SessionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::StoreUnavailable(e) => SessionError::StoreUnavailable(e),
            TokenError::Signing(e) => SessionError::Internal(e),
            _ => SessionError::Unauthorized,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// Signs and verifies claim sets. Verification checks signature and expiry
/// only; the token kind is left for the caller to enforce.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, subject: UserId, kind: TokenKind, ttl: Duration) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

#[async_trait::async_trait]
pub trait SessionManager: Send + Sync {
    async fn login(&self, subject: UserId) -> Result<TokenPair, SessionError>;
    async fn validate_access(&self, token: &str) -> Result<UserId, SessionError>;
    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, SessionError>;
    async fn revoke(&self, subject: UserId) -> Result<(), SessionError>;
}
