// HTTP server setup (Axum REST API under /api)
pub mod app;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

pub use app::*;
pub use error::ApiError;
