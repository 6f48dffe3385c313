//! Server-side session storage.
//!
//! A session is a row keyed by an opaque random token; the browser only
//! ever holds the token in an HttpOnly cookie. Deleting the row (logout)
//! or passing `expires_at` invalidates the cookie.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;
use crate::models::User;

const TOKEN_LENGTH: usize = 48;
const SESSION_LIFETIME_DAYS: i64 = 30;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionService {
    db: SqlitePool,
}

impl SessionService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Issue a new session for the given user.
    pub async fn create_session(&self, user_id: i64) -> Result<Session> {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        let now = Utc::now();
        let expires_at = now + Duration::days(SESSION_LIFETIME_DAYS);

        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (token, user_id, created_at, expires_at)
             VALUES (?, ?, ?, ?)
             RETURNING token, user_id, created_at, expires_at",
        )
        .bind(&token)
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await?;

        Ok(session)
    }

    /// Resolve a session token to its user, ignoring expired sessions.
    pub async fn resolve_user(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email, u.name, u.oauth_provider, u.oauth_id
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ? AND s.expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Destroy a session. Deleting an unknown token is not an error, so
    /// logout stays idempotent.
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
