//! # License Dataset Handler
//!
//! Serves the static license/billing dataset at `/api/licenses`. The file is
//! re-read on every request; the dataset is small and updated out-of-band, so
//! freshness wins over caching.

use std::path::Path;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::server::AppState;

/// `GET /api/licenses` - return the billing dataset as JSON
pub async fn get_license_data(State(state): State<AppState>) -> Response {
    match load_billing_data(&state.billing_data_path).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!(path = %state.billing_data_path.display(), error = %e, "failed to serve billing data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Error reading billing data: {e:#}") })),
            )
                .into_response()
        }
    }
}

/// Read and parse the dataset, tolerating a UTF-8 BOM
///
/// The dataset is exported from a Windows tool that writes a byte-order mark;
/// strip it before parsing.
pub(crate) async fn load_billing_data(path: &Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8(raw).context("billing data is not valid UTF-8")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).context("billing data is not valid JSON")
}
