//! Session authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::SessionService;
use crate::error::ApiError;
use crate::models::User;
use crate::services::UserService;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "workout_session";

/// Authenticated caller, inserted into request extensions by
/// [`require_session`] and read back via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware guarding every `/api` route.
///
/// In authenticated mode the session cookie must resolve to a live
/// session row; in anonymous mode every request runs as the single
/// local user, which is created on first use.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = if state.config.oidc.is_some() {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::Unauthenticated)?;

        let sessions = SessionService::new(state.db.clone());
        sessions
            .resolve_user(&token)
            .await?
            .ok_or(ApiError::Unauthenticated)?
    } else {
        UserService::new(state.db.clone())
            .get_or_create_anonymous()
            .await?
    };

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
