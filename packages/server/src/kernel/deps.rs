//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by the services.
//! All external services use trait abstractions to enable testing.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use cloudinary::models::Transformation;
use cloudinary::{CloudinaryOptions, CloudinaryService, UploadParams};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::auth::{JwtService, PasswordHasher};
use crate::domains::contacts::{ContactRepository, PgContactRepository};
use crate::domains::users::{PgUserRepository, UserRepository};
use crate::kernel::email::SmtpMailer;
use crate::kernel::{BaseFileUploader, BaseMailer, ImageUpload};

// =============================================================================
// CloudinaryService Adapter (implements BaseFileUploader trait)
// =============================================================================

/// Wrapper around CloudinaryService that implements BaseFileUploader trait
pub struct CloudinaryAdapter(pub Arc<CloudinaryService>);

impl CloudinaryAdapter {
    pub fn new(service: Arc<CloudinaryService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseFileUploader for CloudinaryAdapter {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        upload: &ImageUpload,
    ) -> Result<String> {
        let params = UploadParams {
            public_id: upload.public_id.clone(),
            tags: upload.tags.clone(),
            overwrite: upload.overwrite,
        };
        let uploaded = self
            .0
            .upload_image(bytes, file_name, &params)
            .await
            .map_err(|e| anyhow!("{}", e))?;

        let transformation = match upload.fill {
            Some((width, height)) => Transformation::fill(width, height),
            None => Transformation::default(),
        };
        Ok(self
            .0
            .build_url(&upload.public_id, &transformation, Some(uploaded.version)))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every request handler
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub mailer: Arc<dyn BaseMailer>,
    pub uploader: Arc<dyn BaseFileUploader>,
    pub jwt_service: Arc<JwtService>,
    pub password_hasher: PasswordHasher,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
        mailer: Arc<dyn BaseMailer>,
        uploader: Arc<dyn BaseFileUploader>,
        jwt_service: Arc<JwtService>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            contacts,
            mailer,
            uploader,
            jwt_service,
            password_hasher,
        }
    }

    /// Production wiring: Postgres repositories, SMTP and Cloudinary
    pub fn from_config(pool: PgPool, config: &Config) -> Result<Self> {
        let jwt_service =
            Arc::new(JwtService::from_config(&config.jwt).context("Invalid JWT configuration")?);
        let mailer = SmtpMailer::new(&config.mail).context("Invalid mail configuration")?;
        let cloudinary = Arc::new(CloudinaryService::new(CloudinaryOptions {
            cloud_name: config.cloudinary.cloud_name.clone(),
            api_key: config.cloudinary.api_key.clone(),
            api_secret: config.cloudinary.api_secret.clone(),
        }));

        Ok(Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgContactRepository::new(pool)),
            Arc::new(mailer),
            Arc::new(CloudinaryAdapter::new(cloudinary)),
            jwt_service,
            PasswordHasher::new(config.bcrypt_cost),
        ))
    }
}
