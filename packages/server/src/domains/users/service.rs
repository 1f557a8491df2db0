use std::sync::Arc;

use anyhow::Result;

use crate::common::UserId;
use crate::domains::users::models::{NewUser, User};
use crate::domains::users::repository::UserRepository;

/// User operations used by the auth flow and the users routes
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.repository.create(new_user).await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.find_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repository.find_by_username(username).await
    }

    pub async fn confirm_email(&self, email: &str) -> Result<()> {
        self.repository.confirm_email(email).await
    }

    pub async fn update_avatar_url(&self, email: &str, url: &str) -> Result<Option<User>> {
        self.repository.update_avatar_url(email, url).await
    }

    pub async fn store_refresh_token(&self, id: UserId, token_hash: Option<String>) -> Result<()> {
        self.repository.update_refresh_token(id, token_hash).await
    }

    pub async fn ping(&self) -> Result<()> {
        self.repository.ping().await
    }
}
