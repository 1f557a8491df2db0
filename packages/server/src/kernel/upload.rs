//! Avatar uploads.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::kernel::{BaseFileUploader, ImageUpload};

/// Folder prefix for every avatar's public id
pub const AVATAR_FOLDER: &str = "RestApp";
/// Avatars are delivered cropped to fill this square
pub const AVATAR_SIZE: u32 = 250;

/// Stores user avatars through the configured image host
#[derive(Clone)]
pub struct UploadFileService {
    uploader: Arc<dyn BaseFileUploader>,
}

impl UploadFileService {
    pub fn new(uploader: Arc<dyn BaseFileUploader>) -> Self {
        Self { uploader }
    }

    /// Upload (overwriting any previous avatar) and return the delivery URL
    pub async fn upload_file(&self, bytes: Vec<u8>, file_name: &str, username: &str) -> Result<String> {
        let upload = avatar_upload(username);
        let url = self.uploader.upload_image(bytes, file_name, &upload).await?;
        info!(username, public_id = %upload.public_id, "Avatar uploaded");
        Ok(url)
    }
}

/// One avatar per user: the public id is derived from the username
pub fn avatar_upload(username: &str) -> ImageUpload {
    ImageUpload {
        public_id: format!("{}/{}", AVATAR_FOLDER, username),
        tags: vec!["user_avatar".to_string(), format!("user_{}", username)],
        overwrite: true,
        fill: Some((AVATAR_SIZE, AVATAR_SIZE)),
    }
}
