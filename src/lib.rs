//! Workout Tracker: a personal workout planner backend.
//!
//! This crate provides the HTTP API for creating and running workout
//! plans made of ordered, timed exercises, with OpenID Connect login
//! and per-user ownership of all data.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use sqlx::SqlitePool;

use auth::OidcClient;
use config::AppConfig;

/// Shared application state.
pub struct AppState {
    pub config: AppConfig,
    pub db: SqlitePool,
    /// Discovered OIDC client; present only when `config.oidc` is set.
    pub oidc: Option<OidcClient>,
}
