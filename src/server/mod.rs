//! # Dashboard HTTP Server
//!
//! Axum router serving the license dataset, the dashboard homepage, static
//! assets, and health/readiness probes. The `/api/licenses` route sits behind
//! enforced group-membership authorization - see [`authz`].

pub mod authz;
pub mod licenses;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::server::authz::GroupAuthorizer;

/// Server state for health checks
#[derive(Debug, Default)]
pub struct ServerState {
    /// Set to true once the listener has bound
    pub is_ready: AtomicBool,
}

impl ServerState {
    /// Create a not-yet-ready server state
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared request-handling state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the license/billing dataset JSON file
    pub billing_data_path: PathBuf,
    /// Group-membership authorizer guarding the API routes
    pub authorizer: Arc<dyn GroupAuthorizer>,
    /// Security group the caller must belong to
    pub allowed_group_id: Arc<str>,
    /// Readiness flag surfaced at `/readyz`
    pub server_state: Arc<ServerState>,
}

/// Build the dashboard router
///
/// Routes:
/// - `GET /api/licenses` - license dataset (authorization enforced)
/// - `GET /` - dashboard homepage
/// - `GET /static/*` - static assets
/// - `GET /healthz`, `GET /readyz` - probes
pub fn build_router(state: AppState, asset_dir: &Path) -> Router {
    Router::new()
        .route("/api/licenses", get(licenses::get_license_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authz::require_group_membership,
        ))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route_service("/", ServeFile::new(asset_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(asset_dir.join("static")))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe
async fn healthz() -> &'static str {
    "ok"
}

/// Readiness probe, backed by the bind flag set in [`start_server`]
async fn readyz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.server_state.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Bind the listener, mark the state ready, and serve until shutdown
///
/// # Errors
/// Returns an error if the port cannot be bound or the server loop fails.
pub async fn start_server(
    port: u16,
    router: Router,
    server_state: Arc<ServerState>,
) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    server_state.is_ready.store(true, Ordering::Relaxed);
    info!("dashboard server listening on {addr}");

    axum::serve(listener, router)
        .await
        .context("dashboard server error")?;

    Ok(())
}
