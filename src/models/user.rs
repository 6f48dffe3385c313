use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub oauth_provider: String,
    pub oauth_id: String,
}

/// Public profile returned by `/api/user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Verified identity claims extracted from a provider's ID token.
#[derive(Debug, Clone)]
pub struct OidcIdentity {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub name: String,
}
