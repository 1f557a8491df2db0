//! Mapping of domain errors to HTTP responses.
//!
//! Every error body has the shape `{"detail": "..."}`.

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    extract::multipart::{MultipartError, MultipartRejection},
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::{AuthError, ValidationError};
use crate::domains::contacts::ContactError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// An error ready to be returned from a handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
    /// Add `WWW-Authenticate: Bearer`
    pub bearer_challenge: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            bearer_challenge: false,
        }
    }

    /// 401 carrying the bearer challenge header
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self {
            bearer_challenge: true,
            ..Self::new(StatusCode::UNAUTHORIZED, detail)
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    /// Log the cause and hide it from the client
    pub fn internal(err: anyhow::Error) -> Self {
        error!(error = ?err, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response();
        if self.bearer_challenge {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let detail = err.to_string();
        match err {
            AuthError::UserAlreadyExists => Self::new(StatusCode::CONFLICT, detail),
            AuthError::InvalidCredentials
            | AuthError::NotAuthenticated
            | AuthError::CouldNotValidateCredentials => Self::unauthorized(detail),
            AuthError::EmailNotConfirmed | AuthError::InvalidRefreshToken => {
                Self::new(StatusCode::UNAUTHORIZED, detail)
            }
            AuthError::InvalidEmailToken | AuthError::Validation(_) => Self::unprocessable(detail),
            AuthError::VerificationFailed => Self::new(StatusCode::BAD_REQUEST, detail),
            AuthError::AdminRequired => Self::new(StatusCode::FORBIDDEN, detail),
            AuthError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        let detail = err.to_string();
        match err {
            ContactError::ContactNotFound | ContactError::ContactsNotFound => {
                Self::new(StatusCode::NOT_FOUND, detail)
            }
            ContactError::Validation(_) => Self::unprocessable(detail),
            ContactError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::unprocessable(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

// =============================================================================
// Extractor rejections
// =============================================================================

/// Malformed input is a 422; transport-level statuses (415, 413) are kept
fn rejection(status: StatusCode, detail: String) -> ApiError {
    if status.is_client_error()
        && status != StatusCode::UNSUPPORTED_MEDIA_TYPE
        && status != StatusCode::PAYLOAD_TOO_LARGE
    {
        ApiError::unprocessable(detail)
    } else {
        ApiError::new(status, detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        rejection(r.status(), r.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(r: FormRejection) -> Self {
        rejection(r.status(), r.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        rejection(r.status(), r.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        rejection(r.status(), r.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(r: MultipartRejection) -> Self {
        rejection(r.status(), r.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        rejection(e.status(), e.body_text())
    }
}
