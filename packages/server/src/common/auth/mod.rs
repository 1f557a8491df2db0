//! Authentication and authorization errors shared by the auth service and
//! the HTTP layer.

mod errors;

pub use errors::AuthError;
