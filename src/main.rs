//! # Billing Dashboard Server
//!
//! Entry point for the dashboard backend. All the work happens in
//! [`billing_dashboard::runtime::initialize`]; `main` just waits on the
//! server task.

use anyhow::{Context, Result};
use billing_dashboard::runtime::initialize;

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize().await?;

    init_result
        .server_handle
        .await
        .context("HTTP server task failed")?;

    Ok(())
}
