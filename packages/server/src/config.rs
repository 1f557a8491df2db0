use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// SMTP settings for outgoing verification mail
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub username: String,
    pub password: String,
    pub from: String,
    pub from_name: String,
    pub server: String,
    pub port: u16,
    pub starttls: bool,
    pub ssl_tls: bool,
    pub use_credentials: bool,
}

/// Cloudinary account used for avatar storage
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Token lifetimes and signing parameters
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub issuer: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_minutes: i64,
    pub email_token_expire_days: i64,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub cloudinary: CloudinaryConfig,
    pub allowed_origins: Vec<String>,
    pub app_base_url: Option<String>,
    pub me_rate_limit_per_minute: u32,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8000)?,
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
                algorithm: env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "contact-manager".to_string()),
                access_token_expire_minutes: parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 15)?,
                refresh_token_expire_minutes: parse_or("REFRESH_TOKEN_EXPIRE_MINUTES", 60 * 24 * 7)?,
                email_token_expire_days: parse_or("EMAIL_TOKEN_EXPIRE_DAYS", 7)?,
            },
            mail: MailConfig {
                username: env::var("MAIL_USERNAME").unwrap_or_default(),
                password: env::var("MAIL_PASSWORD").unwrap_or_default(),
                from: env::var("MAIL_FROM").context("MAIL_FROM must be set")?,
                from_name: env::var("MAIL_FROM_NAME")
                    .unwrap_or_else(|_| "Rest API Service".to_string()),
                server: env::var("MAIL_SERVER").context("MAIL_SERVER must be set")?,
                port: parse_or("MAIL_PORT", 465)?,
                starttls: parse_bool_or("MAIL_STARTTLS", false)?,
                ssl_tls: parse_bool_or("MAIL_SSL_TLS", true)?,
                use_credentials: parse_bool_or("USE_CREDENTIALS", true)?,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_NAME").context("CLOUDINARY_NAME must be set")?,
                api_key: env::var("CLOUDINARY_API_KEY")
                    .context("CLOUDINARY_API_KEY must be set")?,
                api_secret: env::var("CLOUDINARY_API_SECRET")
                    .context("CLOUDINARY_API_SECRET must be set")?,
            },
            allowed_origins: parse_list(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:8000".to_string()),
            ),
            app_base_url: env::var("APP_BASE_URL").ok().filter(|s| !s.is_empty()),
            me_rate_limit_per_minute: parse_or("ME_RATE_LIMIT_PER_MINUTE", 2)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

/// Booleans accept any case of true/false plus 1/0
fn parse_bool_or(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(&value)
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
