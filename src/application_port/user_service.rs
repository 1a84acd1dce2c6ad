use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<UserProfile>,
    pub meta: Pagination,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, input: CreateUserInput) -> Result<User, UserError>;
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;
    async fn list_users(&self, page: PageRequest) -> Result<UserPage, UserError>;
    async fn update_user(&self, id: UserId, input: UpdateUserInput) -> Result<User, UserError>;
    async fn delete_user(&self, id: UserId) -> Result<(), UserError>;
    async fn count_users(&self) -> Result<u64, UserError>;
}
