//! OpenID Connect client for the external identity provider.
//!
//! Thin wrapper over `openidconnect` covering exactly what the login flow
//! needs: discovery, authorization URL construction, and code exchange
//! with ID-token claim verification.

use anyhow::{Context, Result};
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreJsonWebKeySet, CoreProviderMetadata,
};
use openidconnect::reqwest::async_http_client;
use openidconnect::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, RedirectUrl,
    Scope, TokenResponse, TokenUrl,
};

use crate::config::OidcConfig;
use crate::error::ApiError;
use crate::models::OidcIdentity;

pub struct OidcClient {
    client: CoreClient,
    provider: String,
}

impl OidcClient {
    /// Discover the provider's endpoints and build a configured client.
    pub async fn discover(config: &OidcConfig) -> Result<Self> {
        let issuer = IssuerUrl::new(config.issuer_url.clone())
            .context("invalid OIDC issuer URL")?;
        let provider_metadata = CoreProviderMetadata::discover_async(issuer, async_http_client)
            .await
            .context("OIDC provider discovery failed")?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_url.clone())
                .context("invalid OIDC redirect URL")?,
        );

        Ok(Self {
            client,
            provider: "google".to_string(),
        })
    }

    /// Build a client from fixed endpoints without network discovery.
    ///
    /// This is intended for deterministic local/integration tests.
    pub fn new_with_static_endpoints(
        config: &OidcConfig,
        auth_url: &str,
        token_url: &str,
    ) -> Result<Self> {
        let client = CoreClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            IssuerUrl::new(config.issuer_url.clone())
                .context("invalid OIDC issuer URL")?,
            AuthUrl::new(auth_url.to_string()).context("invalid authorization URL")?,
            Some(TokenUrl::new(token_url.to_string()).context("invalid token URL")?),
            None,
            CoreJsonWebKeySet::new(Vec::new()),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_url.clone())
                .context("invalid OIDC redirect URL")?,
        );

        Ok(Self {
            client,
            provider: "google".to_string(),
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Build the provider authorization URL with fresh CSRF state and nonce.
    pub fn authorize_url(&self) -> (String, CsrfToken, Nonce) {
        let (url, csrf_token, nonce) = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();

        (url.to_string(), csrf_token, nonce)
    }

    /// Exchange the callback code for tokens and extract verified identity
    /// claims from the ID token.
    pub async fn exchange_code(
        &self,
        code: String,
        nonce: &Nonce,
    ) -> std::result::Result<OidcIdentity, ApiError> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client)
            .await
            .map_err(|err| ApiError::Authentication(format!("code exchange failed: {err}")))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| ApiError::Authentication("provider returned no ID token".into()))?;
        let claims = id_token
            .claims(&self.client.id_token_verifier(), nonce)
            .map_err(|err| ApiError::Authentication(format!("ID token rejected: {err}")))?;

        let subject = claims.subject().as_str().to_string();
        let email = claims
            .email()
            .map(|email| email.as_str().to_string())
            .ok_or_else(|| ApiError::Authentication("provider returned no email claim".into()))?;
        let name = claims
            .name()
            .and_then(|name| name.get(None))
            .map(|name| name.as_str().to_string())
            .unwrap_or_else(|| email.clone());

        Ok(OidcIdentity {
            provider: self.provider.clone(),
            subject,
            email,
            name,
        })
    }
}
