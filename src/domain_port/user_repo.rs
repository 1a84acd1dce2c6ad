use crate::application_port::UserError;
use crate::domain_model::*;

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with [`UserError::EmailTaken`] when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Oldest first.
    async fn list_paginated(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserError>;

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError>;

    async fn delete(&self, id: UserId) -> Result<(), UserError>;

    async fn count(&self) -> Result<u64, UserError>;
}
