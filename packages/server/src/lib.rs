// Contact Manager - API Core
//
// REST backend for a personal address book: password accounts with JWT
// bearer tokens and email confirmation, per-user contacts with search and
// upcoming birthdays, and avatars stored in Cloudinary.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
