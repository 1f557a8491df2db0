//! Users domain - account records and their persistence
//!
//! Responsibilities:
//! - User rows (credentials hash, confirmation flag, avatar, role)
//! - Repository trait with a Postgres implementation
//! - UserService used by the auth flow and the users routes

pub mod data;
pub mod models;
pub mod repository;
pub mod service;

pub use data::{UserCreate, UserResponse};
pub use models::{NewUser, Role, User};
pub use repository::{DuplicateUser, PgUserRepository, UserRepository};
pub use service::UserService;
