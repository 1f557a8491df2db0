//! Test harness driving the full router in memory.
//!
//! Each test gets its own router wired to in-memory repositories and
//! recording mailer/uploader mocks, so no containers are needed.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Extension};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use contacts_core::kernel::test_dependencies::MockMailer;
use contacts_core::kernel::TestDependencies;
use contacts_core::server::{build_app, AppSettings};
use serde_json::Value;
use test_context::AsyncTestContext;
use tower::ServiceExt;

pub const TEST_BASE_URL: &str = "http://testserver/";
pub const TEST_PASSWORD: &str = "12345678";

/// Captured response with the body parsed as JSON (Null when it is not JSON)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `detail` field of an error body
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Test harness that owns the router and every mock behind it.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let res = ctx.get("/api/auth/public", None).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub router: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().expect("Failed to create test harness")
    }
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Self::with_deps(TestDependencies::new())
    }

    /// Harness around custom mocks (e.g. a failing mailer)
    pub fn with_deps(deps: TestDependencies) -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let settings = AppSettings {
            app_base_url: Some(TEST_BASE_URL.to_string()),
            ..AppSettings::default()
        };
        let router = build_app(deps.server_deps(), settings)
            .context("Failed to build app")?
            // Stands in for into_make_service_with_connect_info; the rate
            // limiter keys on the peer address
            .layer(Extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000)))));

        Ok(Self { deps, router })
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(
            Self::builder(Method::GET, uri, token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(
            Self::builder(Method::DELETE, uri, token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> TestResponse {
        self.send(
            Self::builder(method, uri, token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.json(Method::POST, uri, token, body).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let encoded = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(encoded))
                .unwrap(),
        )
        .await
    }

    /// multipart/form-data request with a single file field
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        field: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let boundary = "contacts-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        self.send(
            Self::builder(method, uri, token)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Register through the API (201 expected)
    pub async fn register(&self, username: &str) -> TestResponse {
        self.post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_form(
            "/api/auth/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Register, confirm the email directly in the store and log in.
    /// Returns the access token.
    pub async fn signed_in_user(&self, username: &str) -> String {
        let res = self.register(username).await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {:?}", res);
        self.deps.users.set_confirmed(username, true);

        let res = self.login(username, TEST_PASSWORD).await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {:?}", res);
        res.body["access_token"]
            .as_str()
            .expect("access_token in login response")
            .to_string()
    }

    /// Token from the most recent confirmation email sent to `email`
    pub fn last_confirmation_token(&self, email: &str) -> Option<String> {
        self.deps
            .mailer
            .sent()
            .iter()
            .rev()
            .find(|m| m.to == email)
            .and_then(MockMailer::confirmation_token)
    }

    /// Wait for background tasks (verification emails) to finish.
    pub async fn settle(&self) {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}
