use thiserror::Error;

use crate::common::validation::ValidationError;

/// Authentication and authorization failures.
///
/// The `Display` text is what clients see in the `detail` field.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email is not confirmed")]
    EmailNotConfirmed,

    /// No bearer token on a protected route
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Could not validate credentials")]
    CouldNotValidateCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Invalid email verification token")]
    InvalidEmailToken,

    #[error("Verification error")]
    VerificationFailed,

    #[error("Insufficient access rights")]
    AdminRequired,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
