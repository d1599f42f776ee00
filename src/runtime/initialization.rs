//! # Initialization
//!
//! Backend initialization logic: rustls setup, tracing subscriber,
//! configuration load, secret store / authorizer wiring, and HTTP server
//! startup with readiness polling.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::config::{AppConfig, AzureAdConfig};
use crate::constants::ALLOWED_GROUP_ID_SLUG;
use crate::secrets::{AmbientWindowsAuth, SecretStoreClient, StoreAuthenticator};
use crate::server::authz::GraphGroupAuthorizer;
use crate::server::{build_router, start_server, AppState, ServerState};

/// Initialization result containing the running server's handles
pub struct InitializationResult {
    /// Loaded application configuration
    pub config: AppConfig,
    /// Server state for readiness checks
    pub server_state: Arc<ServerState>,
    /// Handle of the background server task
    pub server_handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Initialize the backend runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - `.env` loading and tracing subscriber setup
/// - Configuration load
/// - Secret store client and token exchanger wiring
/// - Allowed-group resolution (secret store first, environment fallback)
/// - HTTP server startup with readiness polling
///
/// # Errors
/// Fails if configuration is incomplete, no allowed group ID can be
/// resolved, or the server does not become ready within the startup timeout.
pub async fn initialize() -> Result<InitializationResult> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billing_dashboard=info".into()),
        )
        .init();

    info!("Starting billing dashboard backend");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let authenticator: Arc<dyn StoreAuthenticator> = Arc::new(AmbientWindowsAuth);
    let store = SecretStoreClient::new(&config.secret_store, &config.azure, authenticator)
        .context("Failed to create secret store client")?;

    let allowed_group_id = resolve_allowed_group_id(&store, &config.azure).await?;
    let authorizer = Arc::new(
        GraphGroupAuthorizer::new(&config.azure).context("Failed to create group authorizer")?,
    );

    let server_state = Arc::new(ServerState::new());
    let state = AppState {
        billing_data_path: config.server.billing_data_path.clone().into(),
        authorizer,
        allowed_group_id: allowed_group_id.into(),
        server_state: Arc::clone(&server_state),
    };

    let router = build_router(state, Path::new(&config.server.asset_dir));

    // Start the server in a background task and wait for it to be ready, so
    // readiness probes pass immediately after startup
    let port = config.server.port;
    let server_state_clone = Arc::clone(&server_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, router, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    wait_for_server_ready(&config, &server_state, &server_handle).await?;

    info!("Backend initialized, serving on port {}", port);

    Ok(InitializationResult {
        config,
        server_state,
        server_handle,
    })
}

/// Resolve the allowed security group ID
///
/// Prefers the secret store's `allowedGroupId` item; falls back to the
/// `ALLOWED_GROUP_ID` environment variable. Refuses to start without one -
/// the dashboard never serves with authorization unset.
async fn resolve_allowed_group_id(
    store: &SecretStoreClient,
    azure: &AzureAdConfig,
) -> Result<String> {
    if let Some(group_id) = store.get_secret(ALLOWED_GROUP_ID_SLUG).await {
        info!("allowed group ID resolved from secret store");
        return Ok(group_id);
    }

    if let Some(group_id) = azure.allowed_group_id.clone() {
        warn!("allowed group ID not in secret store, using ALLOWED_GROUP_ID from the environment");
        return Ok(group_id);
    }

    bail!("no allowed group ID available; refusing to serve the dashboard without authorization")
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    config: &AppConfig,
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let startup_timeout = std::time::Duration::from_secs(config.server.startup_timeout_secs);
    let poll_interval = std::time::Duration::from_millis(config.server.poll_interval_ms);
    let start_time = std::time::Instant::now();

    loop {
        // Server task crashed (e.g. port already bound)
        if server_handle.is_finished() {
            bail!("HTTP server failed to start");
        }

        if server_state
            .is_ready
            .load(std::sync::atomic::Ordering::Relaxed)
        {
            info!("HTTP server is ready and accepting connections");
            break;
        }

        if start_time.elapsed() > startup_timeout {
            bail!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            );
        }

        tokio::time::sleep(poll_interval).await;
    }

    Ok(())
}
