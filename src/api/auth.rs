//! Login, OAuth callback, logout, and current-user handlers.

use axum::{
    extract::{Extension, Query, State},
    response::{Json, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use openidconnect::Nonce;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{CurrentUser, OidcClient, SessionService, SESSION_COOKIE};
use crate::error::{ApiError, Result};
use crate::models::UserInfo;
use crate::services::UserService;
use crate::AppState;

/// Short-lived cookie carrying `state|nonce` between /login and /authorize.
const LOGIN_COOKIE: &str = "oauth_login";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Redirect the browser to the provider's authorization endpoint.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let oidc = require_oidc(&state)?;

    let (auth_url, csrf_token, nonce) = oidc.authorize_url();

    let cookie = Cookie::build((
        LOGIN_COOKIE,
        format!("{}|{}", csrf_token.secret(), nonce.secret()),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build();

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// Provider callback: verify state, exchange the code, establish a session.
#[tracing::instrument(skip_all)]
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let oidc = require_oidc(&state)?;

    if let Some(err) = params.error {
        return Err(ApiError::Authentication(format!("provider error: {err}")));
    }
    let code = params
        .code
        .ok_or_else(|| ApiError::Authentication("callback missing code".into()))?;
    let callback_state = params
        .state
        .ok_or_else(|| ApiError::Authentication("callback missing state".into()))?;

    let login_cookie = jar
        .get(LOGIN_COOKIE)
        .ok_or_else(|| ApiError::Authentication("no login in progress".into()))?;
    let (expected_state, nonce) = login_cookie
        .value()
        .split_once('|')
        .ok_or_else(|| ApiError::Authentication("malformed login cookie".into()))?;
    if callback_state != expected_state {
        return Err(ApiError::Authentication("state mismatch".into()));
    }
    let nonce = Nonce::new(nonce.to_string());

    let identity = oidc.exchange_code(code, &nonce).await?;
    let user = UserService::new(state.db.clone())
        .get_or_create(&identity)
        .await?;
    let session = SessionService::new(state.db.clone())
        .create_session(user.id)
        .await?;

    tracing::info!(user_id = user.id, "Login completed");

    let session_cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    let jar = jar
        .remove(Cookie::build(LOGIN_COOKIE).path("/").build())
        .add(session_cookie);

    Ok((jar, Redirect::to("/")))
}

/// Destroy the current session, if any, and clear the cookie.
#[tracing::instrument(skip_all)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        SessionService::new(state.db.clone())
            .delete_session(cookie.value())
            .await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());

    Ok((jar, Redirect::to("/")))
}

/// Public profile of the authenticated caller.
pub async fn current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserInfo> {
    Json(UserInfo::from(user))
}

fn require_oidc(state: &AppState) -> Result<&OidcClient> {
    // The login routes are only mounted in authenticated mode, so this
    // only trips if the router and config disagree.
    state.oidc.as_ref().ok_or(ApiError::NotFound)
}
