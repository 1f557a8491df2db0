use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::validation::{self, ValidationError};
use crate::common::ContactId;
use crate::domains::contacts::models::Contact;

/// Request body for creating or replacing a contact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl ContactInput {
    /// Check column limits and email format
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::required("first_name", &self.first_name, 30)?;
        validation::required("last_name", &self.last_name, 30)?;
        validation::email("email", &self.email, 100)?;
        validation::required("phone", &self.phone, 20)?;
        if let Some(description) = &self.description {
            validation::max_len("description", description, 150)?;
        }
        Ok(())
    }
}

/// Contact as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub description: Option<String>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            birth_date: contact.birth_date,
            description: contact.description,
        }
    }
}
