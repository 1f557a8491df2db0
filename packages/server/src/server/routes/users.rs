use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    Json,
};

use crate::domains::users::UserResponse;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;

/// Largest accepted avatar upload
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// GET /users/me (rate limited per client IP)
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// PATCH /users/avatar (multipart field `file`)
pub async fn update_avatar(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::unprocessable("Field required: file"))?;
    if bytes.is_empty() {
        return Err(ApiError::unprocessable("Uploaded file is empty"));
    }

    let avatar_url = state
        .uploads
        .upload_file(bytes.to_vec(), &file_name, &user.username)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Avatar upload failed");
            ApiError::new(StatusCode::BAD_GATEWAY, "Avatar upload failed")
        })?;

    let user = state
        .users
        .update_avatar_url(&user.email, &avatar_url)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "User not found"))?;

    Ok(Json(user.into()))
}
