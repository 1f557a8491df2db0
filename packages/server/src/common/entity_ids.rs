//! Typed ID definitions for all domain entities.
//!
//! ```rust
//! use contacts_core::common::{ContactId, UserId};
//!
//! let user_id = UserId::from_i64(1);
//! let contact_id = ContactId::from_i64(1);
//!
//! // This would be a compile error:
//! // let wrong: ContactId = user_id;
//! # let _ = (user_id, contact_id);
//! ```

pub use super::id::Id;

/// Marker type for User entities (account owners).
pub struct User;

/// Marker type for Contact entities (address book entries).
pub struct Contact;

pub type UserId = Id<User>;
pub type ContactId = Id<Contact>;
