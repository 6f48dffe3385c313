#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

use workout_tracker::api::routes::create_router;
use workout_tracker::auth::OidcClient;
use workout_tracker::config::{AppConfig, OidcConfig};
use workout_tracker::AppState;

/// Authorization endpoint baked into the static test OIDC client.
pub const TEST_AUTH_URL: &str = "https://auth.example.test/authorize";

/// Fresh in-memory database with migrations applied. A single connection
/// keeps the whole pool on one in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool
}

fn test_config(oidc: Option<OidcConfig>) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: "static".to_string(),
        oidc,
    }
}

/// App in anonymous single-user mode: no login routes, every request
/// runs as the implicit local user.
pub fn anonymous_app(pool: SqlitePool) -> Router {
    create_router(Arc::new(AppState {
        config: test_config(None),
        db: pool,
        oidc: None,
    }))
}

/// App in authenticated mode. The OIDC client is built from static
/// endpoints (no network in tests), so the login routes mount and the
/// session middleware enforces cookies exactly as in production. The
/// code-exchange leg needs a live provider, so tests mint sessions
/// directly through `SessionService`.
pub fn authenticated_app(pool: SqlitePool) -> Router {
    let oidc_config = OidcConfig {
        issuer_url: "https://auth.example.test".to_string(),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_url: "http://localhost:5000/authorize".to_string(),
    };
    let oidc = OidcClient::new_with_static_endpoints(
        &oidc_config,
        TEST_AUTH_URL,
        "https://auth.example.test/token",
    )
    .expect("static OIDC client");

    create_router(Arc::new(AppState {
        config: test_config(Some(oidc_config)),
        db: pool,
        oidc: Some(oidc),
    }))
}

/// Drive one request through the router and return the raw response,
/// for tests that need to inspect headers.
pub async fn send_raw(
    app: &Router,
    request: Request<Body>,
) -> axum::http::Response<axum::body::Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Drive one request through the router and decode the JSON body (Null
/// for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    session_token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = session_token {
        builder = builder.header(header::COOKIE, format!("workout_session={token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
