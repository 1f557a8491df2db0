// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Composing the verification mail or choosing the avatar's public id lives in
// the services that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMailer)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Mailer Trait (Infrastructure - outgoing email)
// =============================================================================

/// A rendered HTML email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Deliver a single message
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

// =============================================================================
// File Uploader Trait (Infrastructure - image hosting)
// =============================================================================

/// Where and how to store an uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub public_id: String,
    pub tags: Vec<String>,
    pub overwrite: bool,
    /// Crop-to-fill size (width, height) applied to the returned URL
    pub fill: Option<(u32, u32)>,
}

#[async_trait]
pub trait BaseFileUploader: Send + Sync {
    /// Store the image and return its public delivery URL
    async fn upload_image(&self, bytes: Vec<u8>, file_name: &str, upload: &ImageUpload)
        -> Result<String>;
}
