//! # Credential Data Types
//!
//! Wire representations consumed from the secret store plus the credential
//! set handed to the token exchanger. Secret material is wrapped in
//! [`SecretValue`] so it is zeroized on drop and redacted in `Debug` output.

use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One named key-value pair inside a secret's item list
///
/// External representation, consumed read-only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretItem {
    /// Stable field-name key identifying this value
    pub slug: String,
    /// The item's value; absent values deserialize as empty
    #[serde(default)]
    pub item_value: String,
}

/// Secret store response body for `GET .../secrets/{secret_id}`
#[derive(Debug, Deserialize)]
pub(crate) struct SecretResponse {
    #[serde(default)]
    pub items: Vec<SecretItem>,
}

/// A string that is zeroized on drop and never printed by `Debug`
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(String);

impl SecretValue {
    /// Wrap a secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the wrapped value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Azure AD application credentials extracted from the secret store
///
/// Constructed once per retrieval call and never persisted; its lifetime is
/// the duration of a single token exchange. All three fields are guaranteed
/// non-empty by construction.
#[derive(Debug, Clone)]
pub struct AzureCredentials {
    /// Application (client) ID
    pub client_id: String,
    /// Client secret, redacted in logs and zeroized on drop
    pub client_secret: SecretValue,
    /// Directory (tenant) ID
    pub tenant_id: String,
}

/// Opaque bearer token returned by the identity provider
///
/// Expiry is not tracked - there is no caching or refresh; each call
/// re-fetches credentials and re-exchanges for a fresh token.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretValue);

impl AccessToken {
    /// Wrap a bearer token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretValue::new(token))
    }

    /// Borrow the raw bearer token
    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    /// A short log-safe prefix of the token
    pub fn preview(&self) -> String {
        self.0.expose().chars().take(10).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_item_deserializes_camel_case() {
        let item: SecretItem =
            serde_json::from_str(r#"{"slug": "clientId", "itemValue": "app-123"}"#).unwrap();
        assert_eq!(item.slug, "clientId");
        assert_eq!(item.item_value, "app-123");
    }

    #[test]
    fn secret_item_tolerates_missing_value() {
        let item: SecretItem = serde_json::from_str(r#"{"slug": "notes"}"#).unwrap();
        assert!(item.item_value.is_empty());
    }

    #[test]
    fn secret_value_debug_is_redacted() {
        let secret = SecretValue::new("hunter2");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
    }

    #[test]
    fn credentials_debug_does_not_reveal_secret() {
        let creds = AzureCredentials {
            client_id: "app-123".to_string(),
            client_secret: SecretValue::new("super-secret"),
            tenant_id: "tenant-456".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("app-123"));
    }

    #[test]
    fn access_token_preview_truncates() {
        let token = AccessToken::new("eyJhbGciOiJSUzI1NiJ9");
        assert_eq!(token.preview(), "eyJhbGciOi");
        assert_eq!(token.expose(), "eyJhbGciOiJSUzI1NiJ9");
    }
}
