//! Persistence for user accounts.
//!
//! `PgUserRepository` is the production implementation; tests use the
//! in-memory implementation from `kernel::test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::common::UserId;
use crate::domains::users::models::{NewUser, User};

/// Returned (inside `anyhow::Error`) when the email or username is taken.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("user with this email or username already exists")]
pub struct DuplicateUser;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new, unconfirmed user
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Mark the user's email as confirmed (no-op for unknown emails)
    async fn confirm_email(&self, email: &str) -> Result<()>;

    /// Set the avatar URL, returning the updated user
    async fn update_avatar_url(&self, email: &str, url: &str) -> Result<Option<User>>;

    /// Replace (or clear) the stored refresh token hash
    async fn update_refresh_token(&self, id: UserId, token_hash: Option<String>) -> Result<()>;

    /// Check that the backing store answers
    async fn ping(&self) -> Result<()>;
}

/// Postgres-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => DuplicateUser.into(),
            _ => e.into(),
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn confirm_email(&self, email: &str) -> Result<()> {
        sqlx::query("UPDATE users SET is_confirmed = TRUE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_avatar_url(&self, email: &str, url: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET avatar = $2
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn update_refresh_token(&self, id: UserId, token_hash: Option<String>) -> Result<()> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        anyhow::ensure!(one == 1, "database returned an unexpected value");
        Ok(())
    }
}
