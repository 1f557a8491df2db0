pub mod contact;

pub use contact::{ContactInput, ContactResponse};
