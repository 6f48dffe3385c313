use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{OidcIdentity, User};

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look up a user by (provider, subject), creating one on first login.
    /// A repeated login for the same pair always resolves to the same row.
    pub async fn get_or_create(&self, identity: &OidcIdentity) -> Result<User> {
        if let Some(user) = sqlx::query_as::<_, User>(
            "SELECT id, email, name, oauth_provider, oauth_id
             FROM users WHERE oauth_provider = ? AND oauth_id = ?",
        )
        .bind(&identity.provider)
        .bind(&identity.subject)
        .fetch_optional(&self.db)
        .await?
        {
            return Ok(user);
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, oauth_provider, oauth_id)
             VALUES (?, ?, ?, ?)
             RETURNING id, email, name, oauth_provider, oauth_id",
        )
        .bind(&identity.email)
        .bind(&identity.name)
        .bind(&identity.provider)
        .bind(&identity.subject)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = user.id, "Created user on first login");

        Ok(user)
    }

    /// The single implicit user for anonymous mode.
    pub async fn get_or_create_anonymous(&self) -> Result<User> {
        self.get_or_create(&OidcIdentity {
            provider: "local".to_string(),
            subject: "anonymous".to_string(),
            email: "anonymous@localhost".to_string(),
            name: "Anonymous".to_string(),
        })
        .await
    }
}
