use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtConfig;

/// What a token may be used for. A token is only accepted where its own
/// type is expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    EmailVerification,
}

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // Username (access/refresh) or email (verification)
    pub token_type: TokenType, // Intended use
    pub exp: i64,              // Expiration timestamp
    pub iat: i64,              // Issued at timestamp
    pub iss: String,           // Issuer
    pub jti: String,           // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies JWT tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    email_ttl: Duration,
}

impl JwtService {
    /// Create new JWT service with secret and issuer (HS256, default lifetimes)
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            issuer,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
            email_ttl: Duration::days(7),
        }
    }

    /// Build from configuration; only HMAC algorithms are accepted
    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .with_context(|| format!("Unknown JWT algorithm: {}", config.algorithm))?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            bail!("JWT algorithm {:?} needs a key pair; use HS256, HS384 or HS512", algorithm);
        }

        let mut service = Self::new(&config.secret, config.issuer.clone()).with_lifetimes(
            lifetime(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                config.access_token_expire_minutes,
                Duration::try_minutes,
            )?,
            lifetime(
                "REFRESH_TOKEN_EXPIRE_MINUTES",
                config.refresh_token_expire_minutes,
                Duration::try_minutes,
            )?,
            lifetime(
                "EMAIL_TOKEN_EXPIRE_DAYS",
                config.email_token_expire_days,
                Duration::try_days,
            )?,
        );
        service.algorithm = algorithm;
        Ok(service)
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration, email: Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self.email_ttl = email;
        self
    }

    /// Short-lived bearer token for API calls
    pub fn create_access_token(&self, username: &str) -> Result<String> {
        self.create_token(username, TokenType::Access, self.access_ttl)
    }

    /// Long-lived token exchanged for new access tokens
    pub fn create_refresh_token(&self, username: &str) -> Result<String> {
        self.create_token(username, TokenType::Refresh, self.refresh_ttl)
    }

    /// Token embedded in the email confirmation link
    pub fn create_email_token(&self, email: &str) -> Result<String> {
        self.create_token(email, TokenType::EmailVerification, self.email_ttl)
    }

    fn create_token(&self, subject: &str, token_type: TokenType, ttl: Duration) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .context("Token expiry is out of range")?;

        let claims = Claims {
            sub: subject.to_string(),
            token_type,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if the token is valid, not expired, and of the expected type
    pub fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)?;

        if claims.token_type != expected {
            bail!(
                "expected {:?} token, got {:?}",
                expected,
                claims.token_type
            );
        }
        Ok(claims)
    }
}

fn lifetime(name: &str, value: i64, to_duration: fn(i64) -> Option<Duration>) -> Result<Duration> {
    match to_duration(value) {
        Some(ttl) => Ok(ttl),
        None => bail!("{} is out of range: {}", name, value),
    }
}

/// SHA-256 hex digest of a token, used so raw refresh tokens are never stored
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
