use super::util::store_err;
use crate::application_port::UserError;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

const SELECT_USER: &str = "SELECT user_id, name, email, password_hash, created_at FROM user";

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(row: MySqlRow) -> Result<User, UserError> {
        let read = |e: sqlx::Error| UserError::Store(e.to_string());
        Ok(User {
            id: row.try_get::<UserId, _>("user_id").map_err(read)?,
            name: row.try_get("name").map_err(read)?,
            email: row.try_get("email").map_err(read)?,
            password_hash: row.try_get("password_hash").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        sqlx::query(
            r#"
INSERT INTO user (user_id, name, email, password_hash, created_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("insert user", e))?;

        Ok(User::from(user))
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let (sql, value) = match filter {
            UserFilter::Email(email) => (format!("{SELECT_USER} WHERE email = ?"), email),
        };

        sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err("query user", e))?
            .map(Self::row_to_user)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        sqlx::query(&format!("{SELECT_USER} WHERE user_id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_err("query user", e))?
            .map(Self::row_to_user)
            .transpose()
    }

    async fn list_paginated(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!(
            "{SELECT_USER} ORDER BY created_at, user_id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("list users", e))?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError> {
        sqlx::query("UPDATE user SET name = ?, email = ? WHERE user_id = ?")
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("update user", e))?;

        // rows_affected is 0 for a no-op update, so re-read instead
        self.find_by_id(id).await?.ok_or(UserError::NotFound)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM user WHERE user_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_err("delete user", e))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, UserError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_err("count users", e))?;

        Ok(count.max(0) as u64)
    }
}
