//! Router assembly: API routes, auth routes, and the SPA fallback.

use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::{auth, workouts};
use crate::auth::require_session;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Report service liveness.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Credentialed CORS for local development against a separately
    // served front end; production serves the SPA from the same origin.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Every /api route runs behind the session middleware. The profile
    // endpoint only exists in authenticated mode; the anonymous variant
    // has no user to describe.
    let mut api_routes = Router::new()
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/workouts/:id",
            get(workouts::get_workout)
                .put(workouts::update_workout)
                .delete(workouts::delete_workout),
        );
    if state.oidc.is_some() {
        api_routes = api_routes.route("/user", get(auth::current_user));
    }
    let api_routes = api_routes.route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_session,
    ));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    // The login dance only exists in authenticated mode.
    if state.oidc.is_some() {
        router = router
            .route("/login", get(auth::login))
            .route("/authorize", get(auth::authorize))
            .route("/logout", get(auth::logout));
    }

    // Static SPA: existing files are served as-is, everything else
    // (including /) falls back to the bootstrap document so client-side
    // routing works.
    let static_dir = &state.config.static_dir;
    let spa = ServeDir::new(static_dir)
        .fallback(ServeFile::new(format!("{static_dir}/index.html")));

    router
        .fallback_service(spa)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
