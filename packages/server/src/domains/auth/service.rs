use std::sync::Arc;

use tracing::{debug, info};

use crate::common::AuthError;
use crate::domains::auth::jwt::{token_fingerprint, JwtService, TokenType};
use crate::domains::auth::password::PasswordHasher;
use crate::domains::auth::types::{EmailConfirmation, TokenPair};
use crate::domains::users::{DuplicateUser, NewUser, User, UserCreate, UserService};

/// Registration, login, token refresh and email confirmation
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: UserService, jwt: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        Self { users, jwt, hasher }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Create an unconfirmed account. Username and email must both be free.
    pub async fn register(&self, body: UserCreate) -> Result<User, AuthError> {
        let body = body.normalized()?;

        let by_email = self.users.get_user_by_email(&body.email).await?;
        let by_username = self.users.get_user_by_username(&body.username).await?;
        if by_email.is_some() || by_username.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let hashed_password = self.hasher.hash(&body.password).await?;
        let user = self
            .users
            .create_user(NewUser {
                email: body.email,
                username: body.username,
                hashed_password,
            })
            .await
            .map_err(|e| {
                if e.is::<DuplicateUser>() {
                    AuthError::UserAlreadyExists
                } else {
                    AuthError::InternalError(e)
                }
            })?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a fresh access/refresh pair
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.get_user_by_username(username).await? {
            Some(user) => user,
            None => {
                debug!(username, "Login for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.hashed_password).await? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let access_token = self.jwt.create_access_token(&user.username)?;
        let refresh_token = self.jwt.create_refresh_token(&user.username)?;
        self.users
            .store_refresh_token(user.id, Some(token_fingerprint(&refresh_token)))
            .await?;

        info!(user_id = %user.id, "User logged in");
        Ok(TokenPair::bearer(access_token, refresh_token))
    }

    /// Exchange the refresh token stored at login for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .jwt
            .verify_token(refresh_token, TokenType::Refresh)
            .map_err(|e| {
                debug!(error = %e, "Rejected refresh token");
                AuthError::InvalidRefreshToken
            })?;

        let user = self
            .users
            .get_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let presented = token_fingerprint(refresh_token);
        if user.refresh_token_hash.as_deref() != Some(presented.as_str()) {
            debug!(user_id = %user.id, "Refresh token does not match the stored one");
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.jwt.create_access_token(&user.username)?;
        Ok(TokenPair::bearer(access_token, refresh_token.to_string()))
    }

    /// Resolve the user behind a bearer access token
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self
            .jwt
            .verify_token(access_token, TokenType::Access)
            .map_err(|_| AuthError::CouldNotValidateCredentials)?;

        self.users
            .get_user_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::CouldNotValidateCredentials)
    }

    /// Email address carried by a verification token
    pub fn email_from_token(&self, token: &str) -> Result<String, AuthError> {
        self.jwt
            .verify_token(token, TokenType::EmailVerification)
            .map(|claims| claims.sub)
            .map_err(|_| AuthError::InvalidEmailToken)
    }

    pub async fn confirm_email(&self, token: &str) -> Result<EmailConfirmation, AuthError> {
        let email = self.email_from_token(token)?;
        let user = self
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::VerificationFailed)?;

        if user.is_confirmed {
            return Ok(EmailConfirmation::AlreadyConfirmed);
        }
        self.users.confirm_email(&email).await?;
        info!(user_id = %user.id, "Email confirmed");
        Ok(EmailConfirmation::Confirmed)
    }

    pub fn require_admin(&self, user: &User) -> Result<(), AuthError> {
        if user.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}
