use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use tracing::error;

use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::routes::MessageResponse;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health check endpoint
///
/// Runs `SELECT 1` against the database; 500 when it fails or takes more
/// than five seconds.
pub async fn healthchecker(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    match tokio::time::timeout(DB_CHECK_TIMEOUT, state.users.ping()).await {
        Ok(Ok(())) => Ok(Json(MessageResponse::new("Welcome to the Contact Manager API!"))),
        Ok(Err(e)) => {
            error!(error = %e, "Database health check failed");
            Err(db_unavailable())
        }
        Err(_) => {
            error!("Database health check timed out");
            Err(db_unavailable())
        }
    }
}

fn db_unavailable() -> ApiError {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error connecting to the database",
    )
}
