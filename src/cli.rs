//! # BDCTL CLI
//!
//! Operator tool for the billing dashboard backend. Exercises the
//! credential-retrieval and token-exchange chain end to end against the real
//! secret store and identity provider, printing redacted output.
//!
//! ## Usage
//!
//! ```bash
//! # Verify the secret store holds a complete Azure AD credential set
//! bdctl check-credentials
//!
//! # Run the full chain and print a token prefix
//! bdctl fetch-token
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use billing_dashboard::config::AppConfig;
use billing_dashboard::secrets::{AmbientWindowsAuth, SecretStoreClient, StoreAuthenticator};

/// Billing dashboard operator CLI
#[derive(Parser)]
#[command(name = "bdctl")]
#[command(about = "Billing dashboard operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the Azure AD credential set from the secret store
    CheckCredentials,
    /// Run the full credentials-to-token chain
    FetchToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bdctl=info,billing_dashboard=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let authenticator: Arc<dyn StoreAuthenticator> = Arc::new(AmbientWindowsAuth);
    let store = SecretStoreClient::new(&config.secret_store, &config.azure, authenticator)
        .context("Failed to create secret store client")?;

    match cli.command {
        Commands::CheckCredentials => {
            let credentials = store
                .get_azure_credentials()
                .await
                .context("Credential retrieval failed")?;
            println!("client id: {}", credentials.client_id);
            println!("tenant id: {}", credentials.tenant_id);
            println!("client secret: [REDACTED]");
        }
        Commands::FetchToken => {
            let token = store
                .get_access_token()
                .await
                .context("Token retrieval failed")?;
            println!("access token (first 10 chars): {}...", token.preview());
        }
    }

    Ok(())
}
