use serde::{Deserialize, Serialize};

use crate::common::validation::{self, ValidationError};
use crate::common::UserId;
use crate::domains::users::models::User;

/// Registration request body
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl UserCreate {
    /// Trim whitespace and check field constraints
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let normalized = Self {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password,
        };
        validation::email("email", &normalized.email, 100)?;
        validation::required("username", &normalized.username, 30)?;
        if normalized.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(normalized)
    }
}

/// Public view of a user - never includes the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            avatar: user.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(email: &str, username: &str, password: &str) -> UserCreate {
        UserCreate {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_normalized_trims_fields() {
        let user = body("  nick@example.com ", " nick ", "7654321")
            .normalized()
            .unwrap();
        assert_eq!(user.email, "nick@example.com");
        assert_eq!(user.username, "nick");
        assert_eq!(user.password, "7654321");
    }

    #[test]
    fn test_normalized_rejects_bad_email() {
        let err = body("nick", "nick", "pw").normalized().unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail { field: "email" });
    }

    #[test]
    fn test_normalized_rejects_long_username() {
        let err = body("nick@example.com", &"n".repeat(31), "pw")
            .normalized()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "username",
                max: 30
            }
        );
    }

    #[test]
    fn test_normalized_rejects_empty_password() {
        let err = body("nick@example.com", "nick", "").normalized().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "password" });
    }
}
