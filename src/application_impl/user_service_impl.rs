use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_NAME_LEN: usize = 255;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            credential_hasher,
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_profile(name: &str, email: &str) -> Result<(), UserError> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(UserError::Validation("name must be 1-255 characters".to_string()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(UserError::Validation("invalid email".to_string())),
    }
}

fn validate_password(password: &str) -> Result<(), UserError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(UserError::Validation("password too short".to_string()));
    }
    Ok(())
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn create_user(&self, input: CreateUserInput) -> Result<User, UserError> {
        let CreateUserInput {
            name,
            email,
            password,
        } = input;
        let email = normalize_email(&email);

        validate_profile(&name, &email)?;
        validate_password(&password)?;

        if self
            .user_repo
            .find_one(&UserFilter::Email(email.clone()))
            .await?
            .is_some()
        {
            return Err(UserError::EmailTaken);
        }

        let password_hash = self.credential_hasher.hash_password(&password).await?;
        self.user_repo
            .create(NewUser {
                id: UserId::new_v4(),
                name: name.trim().to_string(),
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn list_users(&self, page: PageRequest) -> Result<UserPage, UserError> {
        let total = self.user_repo.count().await?;
        let users = self
            .user_repo
            .list_paginated(page.skip(), page.limit())
            .await?;

        Ok(UserPage {
            users: users.iter().map(UserProfile::from).collect(),
            meta: Pagination::new(page, total),
        })
    }

    async fn update_user(&self, id: UserId, input: UpdateUserInput) -> Result<User, UserError> {
        let email = normalize_email(&input.email);
        validate_profile(&input.name, &email)?;

        if let Some(other) = self
            .user_repo
            .find_one(&UserFilter::Email(email.clone()))
            .await?
        {
            if other.id != id {
                return Err(UserError::EmailTaken);
            }
        }

        self.user_repo
            .update(
                id,
                UserChanges {
                    name: input.name.trim().to_string(),
                    email,
                },
            )
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        self.user_repo.delete(id).await
    }

    async fn count_users(&self) -> Result<u64, UserError> {
        self.user_repo.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::test_support::PlainHasher;
    use crate::infra_memory::MemoryUserRepo;

    fn service() -> RealUserService {
        RealUserService::new(Arc::new(MemoryUserRepo::new()), Arc::new(PlainHasher))
    }

    fn input(name: &str, email: &str) -> CreateUserInput {
        CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_hashes() {
        let users = service();
        let user = users
            .create_user(input(" Ada ", " Ada@Example.COM "))
            .await
            .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password_hash, "plain:secret123");
        assert_eq!(users.get_user(user.id).await.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let users = service();
        users.create_user(input("a", "a@example.com")).await.unwrap();

        let err = users
            .create_user(input("b", "A@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let users = service();
        assert!(matches!(
            users.create_user(input("", "a@example.com")).await,
            Err(UserError::Validation(_))
        ));
        assert!(matches!(
            users.create_user(input("a", "not-an-email")).await,
            Err(UserError::Validation(_))
        ));
        let mut short = input("a", "a@example.com");
        short.password = "123".to_string();
        assert!(matches!(
            users.create_user(short).await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_pages_in_creation_order() {
        let users = service();
        for i in 0..5 {
            users
                .create_user(input(&format!("user{i}"), &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let page = users.list_users(PageRequest::new(2, 2)).await.unwrap();
        let names: Vec<&str> = page.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["user2", "user3"]);
        assert_eq!(page.meta.total_items, 5);
        assert_eq!(page.meta.total_pages, 3);

        let first = users.list_users(PageRequest::new(0, 0)).await.unwrap();
        assert_eq!(first.users.len(), 5);
        assert_eq!(first.meta.current_page, 1);
        assert_eq!(first.meta.page_size, 10);
    }

    #[tokio::test]
    async fn update_keeps_email_unique() {
        let users = service();
        let a = users.create_user(input("a", "a@example.com")).await.unwrap();
        users.create_user(input("b", "b@example.com")).await.unwrap();

        let taken = users
            .update_user(
                a.id,
                UpdateUserInput {
                    name: "a".to_string(),
                    email: "b@example.com".to_string(),
                },
            )
            .await;
        assert!(matches!(taken, Err(UserError::EmailTaken)));

        let renamed = users
            .update_user(
                a.id,
                UpdateUserInput {
                    name: "alice".to_string(),
                    email: "a@example.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "alice");
    }

    #[tokio::test]
    async fn delete_then_count() {
        let users = service();
        let a = users.create_user(input("a", "a@example.com")).await.unwrap();
        assert_eq!(users.count_users().await.unwrap(), 1);

        users.delete_user(a.id).await.unwrap();
        assert_eq!(users.count_users().await.unwrap(), 0);
        assert!(matches!(users.get_user(a.id).await, Err(UserError::NotFound)));
        assert!(matches!(users.delete_user(a.id).await, Err(UserError::NotFound)));
    }
}
