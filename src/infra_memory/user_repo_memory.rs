use crate::application_port::UserError;
use crate::domain_model::*;
use crate::domain_port::*;
use tokio::sync::RwLock;

/// Insertion-ordered user table for dev and tests.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let filter = UserFilter::Email(user.email.clone());
        if users.iter().any(|u| filter.matches(u)) {
            return Err(UserError::EmailTaken);
        }
        let user = User::from(user);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_paginated(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(users.iter().skip(skip).take(limit as usize).cloned().collect())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let filter = UserFilter::Email(changes.email.clone());
        if users.iter().any(|u| u.id != id && filter.matches(u)) {
            return Err(UserError::EmailTaken);
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound)?;
        user.name = changes.name;
        user.email = changes.email;
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, UserError> {
        Ok(self.users.read().await.len() as u64)
    }
}
