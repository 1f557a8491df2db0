use thiserror::Error;

use crate::common::validation::ValidationError;

/// Contact lookup and validation failures.
///
/// The `Display` text is what clients see in the `detail` field.
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Contact not found")]
    ContactNotFound,

    /// A search or birthday query matched nothing
    #[error("Contacts not found")]
    ContactsNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
