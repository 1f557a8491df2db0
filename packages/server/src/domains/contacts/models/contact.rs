use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{ContactId, UserId};

/// Address book entry owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub description: Option<String>,
    pub user_id: UserId,
}

impl Contact {
    /// Case-insensitive substring match on first name, last name or email
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}
