use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub oidc: Option<OidcConfig>,
}

/// OIDC provider credentials; absent when running in anonymous mode.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()?;
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        // Both credentials present selects authenticated mode; anything
        // else falls back to the anonymous single-user variant.
        let oidc = match (env::var("GOOGLE_CLIENT_ID"), env::var("GOOGLE_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(OidcConfig {
                issuer_url: env::var("OIDC_ISSUER_URL")
                    .unwrap_or_else(|_| "https://accounts.google.com".to_string()),
                client_id,
                client_secret,
                redirect_url: env::var("OIDC_REDIRECT_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{port}/authorize")),
            }),
            _ => None,
        };

        Ok(AppConfig {
            host,
            port,
            static_dir,
            oidc,
        })
    }

    /// Get server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Create database configuration from environment
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/workouts.db".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
        })
    }

    /// Create database connection pool and apply pending migrations
    pub async fn create_pool(&self) -> Result<SqlitePool> {
        // The SQLite driver creates a missing file but not a missing
        // parent directory.
        if let Some(path) = self.url.strip_prefix("sqlite://") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!().run(&pool).await?;

        Ok(pool)
    }
}
