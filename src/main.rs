//! Workout Tracker API server.

use std::sync::Arc;

use workout_tracker::api::routes::create_router;
use workout_tracker::auth::OidcClient;
use workout_tracker::config::{AppConfig, DatabaseConfig};
use workout_tracker::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let db = db_config.create_pool().await?;
    tracing::info!(url = %db_config.url, "Database ready");

    let oidc = match &config.oidc {
        Some(oidc_config) => {
            let client = OidcClient::discover(oidc_config).await?;
            tracing::info!(issuer = %oidc_config.issuer_url, "OIDC provider discovered");
            Some(client)
        }
        None => {
            tracing::warn!("No OIDC credentials configured, running in anonymous mode");
            None
        }
    };

    let addr = config.server_address();
    let state = Arc::new(AppState { config, db, oidc });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_tracker=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
