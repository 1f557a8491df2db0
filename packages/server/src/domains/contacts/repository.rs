//! Persistence for contacts.
//!
//! Every query is scoped to the owning user: a contact that belongs to
//! someone else behaves exactly like a missing one.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{ContactId, Pagination, UserId};
use crate::domains::contacts::data::ContactInput;
use crate::domains::contacts::models::Contact;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Page through the owner's contacts in id order
    async fn list(&self, owner: UserId, page: Pagination) -> Result<Vec<Contact>>;

    /// All of the owner's contacts in id order
    async fn list_all(&self, owner: UserId) -> Result<Vec<Contact>>;

    async fn find_by_id(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>>;

    /// Case-insensitive substring search on first name, last name and email
    async fn search(&self, owner: UserId, query: &str) -> Result<Vec<Contact>>;

    async fn create(&self, owner: UserId, input: ContactInput) -> Result<Contact>;

    /// Replace every field of the contact; `None` when it does not exist
    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Option<Contact>>;

    /// Delete the contact, returning the removed row
    async fn remove(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>>;
}

/// Postgres-backed contact repository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user input is matched literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn list(&self, owner: UserId, page: Pagination) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT *
            FROM contacts
            WHERE user_id = $1
            ORDER BY id ASC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(owner)
        .bind(page.offset())
        .bind(page.effective_limit())
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    async fn list_all(&self, owner: UserId) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    async fn find_by_id(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contact)
    }

    async fn search(&self, owner: UserId, query: &str) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT *
            FROM contacts
            WHERE user_id = $1
              AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2)
            ORDER BY id ASC
            "#,
        )
        .bind(owner)
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    async fn create(&self, owner: UserId, input: ContactInput) -> Result<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (
                first_name, last_name, email, phone, birth_date, description, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.birth_date)
        .bind(&input.description)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(contact)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET first_name = $3, last_name = $4, email = $5, phone = $6,
                birth_date = $7, description = $8
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.birth_date)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contact)
    }

    async fn remove(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contact)
    }
}
