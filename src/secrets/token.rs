//! # Token Exchanger
//!
//! OAuth2 client-credentials grant (RFC 6749 §4.4) against the identity
//! provider's per-tenant token endpoint. A single attempt per call - the
//! caller may retry; there is no state to corrupt on the remote side.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::AzureAdConfig;
use crate::secrets::error::CredentialError;
use crate::secrets::types::{AccessToken, AzureCredentials};

/// Successful token endpoint response; only `access_token` is consumed
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// Performs the client-credentials exchange against the identity provider
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    http: reqwest::Client,
    issuer_base: String,
}

impl TokenExchanger {
    /// Create a new exchanger for the configured identity provider
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AzureAdConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client for the token exchanger")?;

        Ok(Self {
            http,
            issuer_base: config.issuer_base.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange the credentials for a bearer access token
    ///
    /// POSTs a form-encoded `grant_type=client_credentials` request to
    /// `{issuer_base}/{tenant_id}/oauth2/v2.0/token`.
    ///
    /// # Errors
    /// - [`CredentialError::Transport`] when the endpoint is unreachable
    /// - [`CredentialError::TokenExchangeFailed`] on a non-2xx response,
    ///   carrying the upstream status and body for diagnostics
    /// - [`CredentialError::MalformedResponse`] when the 2xx body is not JSON
    ///   or lacks `access_token`
    pub async fn exchange(
        &self,
        credentials: &AzureCredentials,
        scope: &str,
    ) -> Result<AccessToken, CredentialError> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.issuer_base, credentials.tenant_id
        );
        debug!(tenant_id = %credentials.tenant_id, scope, "requesting access token");

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose()),
            ("scope", scope),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(CredentialError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(CredentialError::Transport)?;

        if !status.is_success() {
            error!(%status, "identity provider rejected the client-credentials grant");
            return Err(CredentialError::TokenExchangeFailed { status, body });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CredentialError::MalformedResponse {
                endpoint: "token endpoint",
                reason: e.to_string(),
            })?;

        if parsed.access_token.is_empty() {
            return Err(CredentialError::MalformedResponse {
                endpoint: "token endpoint",
                reason: "response lacks an access_token field".to_string(),
            });
        }

        Ok(AccessToken::new(parsed.access_token))
    }
}
