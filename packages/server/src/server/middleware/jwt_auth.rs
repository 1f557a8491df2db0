use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::common::AuthError;
use crate::domains::users::User;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// The user behind the request's bearer access token.
///
/// Rejects with 401 when the header is missing or the token does not
/// resolve to an existing user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// A [`CurrentUser`] that also has the admin role (403 otherwise)
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app) = Extension::<AxumAppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(anyhow::anyhow!("app state missing: {}", e)))?;

        let token = match extract_bearer_token(&parts.headers) {
            Some(token) => token,
            None => {
                debug!("No bearer token on protected route");
                return Err(AuthError::NotAuthenticated.into());
            }
        };

        let user = app.auth.authenticate(token).await?;
        debug!(user_id = %user.id, "Authenticated user");
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let Extension(app) = Extension::<AxumAppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(anyhow::anyhow!("app state missing: {}", e)))?;
        app.auth.require_admin(&user)?;
        Ok(AdminUser(user))
    }
}

/// Token from the Authorization header (handles both "Bearer <token>" and raw token)
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .unwrap_or(auth_str)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
