//! # Group-Membership Authorization
//!
//! Enforced authorization for the API routes: the caller presents a bearer
//! token and must be a member of the configured security group. There is no
//! bypass path - if membership cannot be established the request is refused.
//!
//! The check itself is behind the [`GroupAuthorizer`] trait so tests can
//! substitute a deterministic implementation.

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::config::AzureAdConfig;
use crate::server::AppState;

/// Verifies that a caller belongs to a security group
#[async_trait]
pub trait GroupAuthorizer: Send + Sync + fmt::Debug {
    /// Whether the caller identified by `bearer_token` is a member of `group_id`
    ///
    /// # Errors
    /// Returns an error only when membership could not be determined (e.g.
    /// the directory service is unreachable). A definite "not a member" is
    /// `Ok(false)`.
    async fn is_member(&self, bearer_token: &str, group_id: &str) -> Result<bool>;
}

/// Microsoft Graph response for `checkMemberGroups`
#[derive(Debug, Deserialize)]
struct CheckMemberGroupsResponse {
    #[serde(default)]
    value: Vec<String>,
}

/// Group-membership checks via Microsoft Graph `checkMemberGroups`
#[derive(Debug, Clone)]
pub struct GraphGroupAuthorizer {
    http: reqwest::Client,
    graph_base: String,
}

impl GraphGroupAuthorizer {
    /// Create an authorizer bound to the configured Graph endpoint
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &AzureAdConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client for Microsoft Graph")?;

        Ok(Self {
            http,
            graph_base: config.graph_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GroupAuthorizer for GraphGroupAuthorizer {
    async fn is_member(&self, bearer_token: &str, group_id: &str) -> Result<bool> {
        let url = format!("{}/v1.0/me/checkMemberGroups", self.graph_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(bearer_token)
            .json(&json!({ "groupIds": [group_id] }))
            .send()
            .await
            .context("Microsoft Graph is unreachable")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Graph could not validate the caller's token; a definite refusal
            debug!(%status, "Graph refused the caller's token");
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Microsoft Graph returned HTTP {status}: {body}");
        }

        let parsed: CheckMemberGroupsResponse = response
            .json()
            .await
            .context("Microsoft Graph returned a malformed checkMemberGroups body")?;

        Ok(parsed.value.iter().any(|id| id == group_id))
    }
}

/// Middleware enforcing group membership on the wrapped routes
///
/// - missing/malformed bearer token: 401
/// - caller not a member of the allowed group: 403
/// - membership could not be determined: 502 (never silently allowed)
pub async fn require_group_membership(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "missing bearer token" })),
        )
            .into_response();
    };

    match state
        .authorizer
        .is_member(token, &state.allowed_group_id)
        .await
    {
        Ok(true) => next.run(request).await,
        Ok(false) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "caller is not a member of the allowed group" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "group-membership check failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "authorization check failed" })),
            )
                .into_response()
        }
    }
}

/// Extract the bearer token from the `Authorization` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}
