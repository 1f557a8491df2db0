// HTTP routes
pub mod auth;
pub mod contacts;
pub mod health;
pub mod users;

use serde::{Deserialize, Serialize};

pub use auth::*;
pub use contacts::*;
pub use health::*;
pub use users::*;

/// `{"message": "..."}` body used by informational endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
