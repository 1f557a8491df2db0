use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, info};

use crate::domains::auth::{EmailConfirmation, LoginForm, RefreshRequest, RequestEmail, TokenPair};
use crate::domains::users::{UserCreate, UserResponse};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::extract::{ApiForm, ApiJson, ApiPath};
use crate::server::middleware::AdminUser;
use crate::server::routes::MessageResponse;

/// POST /auth/register
///
/// Creates the account and mails the confirmation link in the background.
pub async fn register(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.auth.register(body).await?;

    state.email.spawn_verification_email(
        user.email.clone(),
        user.username.clone(),
        state.base_url(&headers),
    );

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login (form-encoded username and password)
pub async fn login(
    Extension(state): Extension<AxumAppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(tokens))
}

/// POST /auth/refresh_token
pub async fn refresh_token(
    Extension(state): Extension<AxumAppState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state.auth.refresh(&body.refresh_token).await?;
    Ok(Json(tokens))
}

/// GET /auth/confirm_email/{token}
pub async fn confirm_email(
    Extension(state): Extension<AxumAppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = match state.auth.confirm_email(&token).await? {
        EmailConfirmation::Confirmed => "Email confirmed",
        EmailConfirmation::AlreadyConfirmed => "Email already confirmed",
    };
    Ok(Json(MessageResponse::new(message)))
}

/// POST /auth/request_email
///
/// Unknown addresses get the same answer as unconfirmed ones.
pub async fn request_email(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<RequestEmail>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = body.email.trim();
    match state.users.get_user_by_email(email).await? {
        Some(user) if user.is_confirmed => {
            return Ok(Json(MessageResponse::new("Email already confirmed")));
        }
        Some(user) => {
            info!(user_id = %user.id, "Resending verification email");
            state
                .email
                .spawn_verification_email(user.email, user.username, state.base_url(&headers));
        }
        None => debug!("Verification email requested for unknown address"),
    }
    Ok(Json(MessageResponse::new(
        "Check your email for confirmation link",
    )))
}

/// GET /auth/public
pub async fn read_public() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "This is a public route accessible to everyone",
    ))
}

/// GET /auth/admin
pub async fn read_admin(AdminUser(user): AdminUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hello, {}! This is an admin route.",
        user.username
    )))
}
