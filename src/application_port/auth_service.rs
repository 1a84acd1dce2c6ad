use crate::application_port::{SessionError, UserError};
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthorized => AuthError::Unauthorized,
            SessionError::StoreUnavailable(e) => AuthError::Store(e),
            SessionError::Internal(e) => AuthError::InternalError(e),
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AuthError::UserNotFound,
            UserError::EmailTaken => AuthError::UserExists,
            UserError::Validation(e) => AuthError::Validation(e),
            UserError::Store(e) => AuthError::Store(e),
            UserError::InternalError(e) => AuthError::InternalError(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user_id: UserId,
    pub tokens: TokenPair,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, UserError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, UserError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, request: RegisterInput) -> Result<User, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    async fn profile(&self, user_id: UserId) -> Result<User, AuthError>;
    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;
    async fn logout(&self, user_id: UserId) -> Result<(), AuthError>;
}
