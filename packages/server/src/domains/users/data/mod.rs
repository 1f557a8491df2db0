pub mod user;

pub use user::{UserCreate, UserResponse};
