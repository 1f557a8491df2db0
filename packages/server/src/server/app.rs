//! Application setup and server configuration.

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::HOST, HeaderMap, HeaderValue},
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::domains::auth::AuthService;
use crate::domains::contacts::ContactsService;
use crate::domains::users::UserService;
use crate::kernel::{EmailService, ServerDeps, UploadFileService};
use crate::server::middleware::limit_per_client_ip;
use crate::server::routes::{
    confirm_email, create_contact, healthchecker, login, me, read_admin, read_contact,
    read_contacts, read_public, refresh_token, register, remove_contact, request_email,
    search_contacts, upcoming_birthdays, update_avatar, update_contact, MAX_AVATAR_BYTES,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub auth: AuthService,
    pub users: UserService,
    pub contacts: ContactsService,
    pub email: EmailService,
    pub uploads: UploadFileService,
    pub app_base_url: Option<String>,
}

impl AxumAppState {
    pub fn new(deps: ServerDeps, app_base_url: Option<String>) -> Self {
        let users = UserService::new(deps.users);
        Self {
            auth: AuthService::new(users.clone(), deps.jwt_service.clone(), deps.password_hasher),
            users,
            contacts: ContactsService::new(deps.contacts),
            email: EmailService::new(deps.mailer, deps.jwt_service),
            uploads: UploadFileService::new(deps.uploader),
            app_base_url,
        }
    }

    /// Public base URL ending in `/`, used in confirmation links.
    ///
    /// `APP_BASE_URL` wins; otherwise the request's Host header is used.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.app_base_url {
            return with_trailing_slash(base);
        }
        let host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost:8000");
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("http");
        format!("{}://{}/", scheme, host)
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// HTTP-facing settings that are not dependencies
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub allowed_origins: Vec<String>,
    pub app_base_url: Option<String>,
    pub me_rate_limit_per_minute: u32,
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            app_base_url: config.app_base_url.clone(),
            me_rate_limit_per_minute: config.me_rate_limit_per_minute,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8000".to_string(),
            ],
            app_base_url: None,
            me_rate_limit_per_minute: 2,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Credentials cannot be combined with wildcards, so methods and headers
    // mirror the preflight request
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

fn auth_routes() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh_token", post(refresh_token))
        .route("/confirm_email/:token", get(confirm_email))
        .route("/request_email", post(request_email))
        .route("/public", get(read_public))
        .route("/admin", get(read_admin))
}

fn contact_routes() -> Router {
    Router::new()
        .route("/", get(read_contacts).post(create_contact))
        .route("/search", get(search_contacts))
        .route("/birthdays", get(upcoming_birthdays))
        .route(
            "/:contact_id",
            get(read_contact).patch(update_contact).delete(remove_contact),
        )
}

fn user_routes(me_rate_limit_per_minute: u32) -> Result<Router> {
    let me_route = limit_per_client_ip(Router::new().route("/me", get(me)), me_rate_limit_per_minute)?;

    Ok(me_route.route(
        "/avatar",
        patch(update_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES)),
    ))
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, settings: AppSettings) -> Result<Router> {
    let app_state = AxumAppState::new(deps, settings.app_base_url.clone());

    let api = Router::new()
        .route("/healthchecker", get(healthchecker))
        .nest("/auth", auth_routes())
        .nest("/contacts", contact_routes())
        .nest("/users", user_routes(settings.me_rate_limit_per_minute)?);

    let app = Router::new()
        .nest("/api", api)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
