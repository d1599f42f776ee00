//! # Credential Error Types
//!
//! Typed errors for the secret store / token exchange chain. Each stage of
//! the chain fails with a distinct kind so callers can tell secret retrieval
//! failures apart from token exchange failures.

use reqwest::StatusCode;
use thiserror::Error;

/// Error raised while retrieving credentials or exchanging them for a token
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Network or connection failure before an HTTP status was received
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// Secret store answered with a non-success status
    #[error("secret store returned HTTP {status}: {body}")]
    HttpStatus {
        /// Upstream HTTP status
        status: StatusCode,
        /// Upstream response body, kept for diagnostics
        body: String,
    },

    /// Response body could not be parsed or lacked expected fields
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// Which upstream endpoint produced the body
        endpoint: &'static str,
        /// Parser or validation failure detail
        reason: String,
    },

    /// The secret's item list lacked one or more required credential slugs
    ///
    /// Never returned alongside a partial credential set - the whole
    /// retrieval fails.
    #[error("secret is missing required credential fields: {}", .missing.join(", "))]
    MissingCredentialFields {
        /// Precisely the slugs that were absent or empty
        missing: Vec<&'static str>,
    },

    /// The identity provider rejected or errored on the grant
    #[error("token exchange failed with HTTP {status}: {body}")]
    TokenExchangeFailed {
        /// Identity provider HTTP status
        status: StatusCode,
        /// Identity provider response body, kept for diagnostics
        body: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_slug() {
        let err = CredentialError::MissingCredentialFields {
            missing: vec!["clientId", "tenantId"],
        };
        assert_eq!(
            err.to_string(),
            "secret is missing required credential fields: clientId, tenantId"
        );
    }

    #[test]
    fn token_exchange_failure_carries_status_and_body() {
        let err = CredentialError::TokenExchangeFailed {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"invalid_client"}"#.to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("400"));
        assert!(rendered.contains("invalid_client"));
    }
}
