use anyhow::{Context, Result};

/// bcrypt password hashing.
///
/// Hashing runs on the blocking pool so it never stalls the async workers.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")
    }

    /// `false` for a wrong password or a malformed stored hash
    pub async fn verify(&self, password: &str, hashed: &str) -> Result<bool> {
        let password = password.to_string();
        let hashed = hashed.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
            .await
            .context("password verification task failed")?;
        Ok(verified.unwrap_or(false))
    }
}
