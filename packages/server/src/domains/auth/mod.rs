//! Auth domain - password accounts with JWT bearer tokens
//!
//! Responsibilities:
//! - bcrypt password hashing
//! - Access, refresh and email-verification tokens
//! - Registration, login, refresh and email confirmation rules

pub mod jwt;
pub mod password;
pub mod service;
pub mod types;

pub use jwt::{token_fingerprint, Claims, JwtService, TokenType};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use types::{EmailConfirmation, LoginForm, RefreshRequest, RequestEmail, TokenPair};
