//! Contacts domain - each user's private address book
//!
//! Responsibilities:
//! - Contact rows owned by a single user
//! - Repository trait with a Postgres implementation
//! - ContactsService (CRUD, search, upcoming birthdays)

pub mod data;
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use data::{ContactInput, ContactResponse};
pub use errors::ContactError;
pub use models::Contact;
pub use repository::{ContactRepository, PgContactRepository};
pub use service::{next_birthday, ContactsService, BIRTHDAY_WINDOW_DAYS};
