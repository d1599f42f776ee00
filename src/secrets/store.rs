//! # Secret Store Client
//!
//! Retrieves named credential fields from a remote secret-management service
//! over Windows-integrated authentication, and drives the full
//! credentials-to-token chain.
//!
//! Single-field lookups via [`SecretStoreClient::get_secret`] fail soft
//! (logged, absent result); the credential-set retrieval fails fast rather
//! than ever returning a partially-populated set.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::{AzureAdConfig, SecretStoreConfig};
use crate::constants::{
    CLIENT_ID_SLUG, CLIENT_SECRET_SLUG, TENANT_ID_SLUG, WINAUTH_SECRETS_PATH,
};
use crate::secrets::auth::StoreAuthenticator;
use crate::secrets::error::CredentialError;
use crate::secrets::token::TokenExchanger;
use crate::secrets::types::{AccessToken, AzureCredentials, SecretItem, SecretResponse, SecretValue};

/// Client for the Windows-authenticated secret store
#[derive(Debug)]
pub struct SecretStoreClient {
    http: reqwest::Client,
    secret_url: String,
    authenticator: Arc<dyn StoreAuthenticator>,
    exchanger: TokenExchanger,
    scope: String,
}

impl SecretStoreClient {
    /// Create a client bound to one secret store endpoint and secret ID
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(
        store: &SecretStoreConfig,
        azure: &AzureAdConfig,
        authenticator: Arc<dyn StoreAuthenticator>,
    ) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(store.http_timeout_secs));
        if !store.verify_tls {
            warn!("TLS certificate verification is disabled for the secret store");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .context("Failed to create HTTP client for the secret store")?;

        let secret_url = format!(
            "{}/{}/{}",
            store.base_url.trim_end_matches('/'),
            WINAUTH_SECRETS_PATH,
            store.secret_id
        );

        Ok(Self {
            http,
            secret_url,
            authenticator,
            exchanger: TokenExchanger::new(azure)?,
            scope: azure.scope.clone(),
        })
    }

    /// One authenticated GET for the secret's full item list
    async fn fetch_items(&self) -> Result<Vec<SecretItem>, CredentialError> {
        let request = self.authenticator.authenticate(self.http.get(&self.secret_url));
        let response = request.send().await.map_err(CredentialError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::HttpStatus { status, body });
        }

        let payload: SecretResponse =
            response
                .json()
                .await
                .map_err(|e| CredentialError::MalformedResponse {
                    endpoint: "secret store",
                    reason: e.to_string(),
                })?;

        Ok(payload.items)
    }

    /// Retrieve a single named secret field
    ///
    /// Transport failures, non-2xx statuses, parse failures and missing slugs
    /// are all logged and reported as an absent value. Use
    /// [`Self::get_azure_credentials`] when absence must be a hard failure.
    pub async fn get_secret(&self, name: &str) -> Option<String> {
        let items = match self.fetch_items().await {
            Ok(items) => items,
            Err(e) => {
                error!(slug = name, error = %e, "failed to retrieve secret from secret store");
                return None;
            }
        };

        let value = find_slug(&items, name);
        if value.is_none() {
            error!(slug = name, "secret slug not found in secret store response");
        }
        value
    }

    /// Retrieve the full Azure AD credential set in one GET
    ///
    /// Scans all returned items for the `clientId`, `clientSecret` and
    /// `tenantId` slugs (case-insensitive).
    ///
    /// # Errors
    /// Fails fast with [`CredentialError::MissingCredentialFields`] naming
    /// precisely the absent slugs - a partially-populated credential set is
    /// never returned. Transport, status and parse failures surface as their
    /// respective kinds.
    pub async fn get_azure_credentials(&self) -> Result<AzureCredentials, CredentialError> {
        let items = self.fetch_items().await.inspect_err(
            |e| error!(error = %e, "failed to retrieve Azure AD credential items"),
        )?;

        let client_id = find_slug(&items, CLIENT_ID_SLUG);
        let client_secret = find_slug(&items, CLIENT_SECRET_SLUG);
        let tenant_id = find_slug(&items, TENANT_ID_SLUG);

        match (client_id, client_secret, tenant_id) {
            (Some(client_id), Some(client_secret), Some(tenant_id)) => {
                info!("retrieved Azure AD credentials from secret store");
                Ok(AzureCredentials {
                    client_id,
                    client_secret: SecretValue::new(client_secret),
                    tenant_id,
                })
            }
            (client_id, client_secret, tenant_id) => {
                let mut missing = Vec::new();
                if client_id.is_none() {
                    missing.push(CLIENT_ID_SLUG);
                }
                if client_secret.is_none() {
                    missing.push(CLIENT_SECRET_SLUG);
                }
                if tenant_id.is_none() {
                    missing.push(TENANT_ID_SLUG);
                }
                error!(?missing, "secret store response lacks required credential slugs");
                Err(CredentialError::MissingCredentialFields { missing })
            }
        }
    }

    /// Retrieve credentials and exchange them for a bearer access token
    ///
    /// # Errors
    /// Propagates whatever [`Self::get_azure_credentials`] or
    /// [`TokenExchanger::exchange`] raises; the error kind identifies which
    /// stage failed.
    pub async fn get_access_token(&self) -> Result<AccessToken, CredentialError> {
        let credentials = self.get_azure_credentials().await?;
        let token = self.exchanger.exchange(&credentials, &self.scope).await?;
        info!("obtained access token via client-credentials grant");
        Ok(token)
    }
}

/// Find the non-empty value whose slug case-insensitively matches `name`
fn find_slug(items: &[SecretItem], name: &str) -> Option<String> {
    items
        .iter()
        .find(|item| item.slug.eq_ignore_ascii_case(name) && !item.item_value.is_empty())
        .map(|item| item.item_value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(slug: &str, value: &str) -> SecretItem {
        SecretItem {
            slug: slug.to_string(),
            item_value: value.to_string(),
        }
    }

    #[test]
    fn find_slug_matches_case_insensitively() {
        let items = vec![item("CLIENTID", "app-123"), item("other", "x")];
        assert_eq!(find_slug(&items, "clientId").as_deref(), Some("app-123"));
    }

    #[test]
    fn find_slug_ignores_empty_values() {
        let items = vec![item("clientId", "")];
        assert!(find_slug(&items, "clientId").is_none());
    }

    #[test]
    fn find_slug_returns_none_when_absent() {
        let items = vec![item("clientId", "app-123")];
        assert!(find_slug(&items, "tenantId").is_none());
    }
}
