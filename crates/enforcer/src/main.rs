//! Budget enforcer service entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use billing::GcpBilling;
use notify::Notifier;
use tracing_subscriber::EnvFilter;

use enforcer::config::Config;
use enforcer::server::{run_server, AppState};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_json);

    let notifier = Notifier::from_env();

    let token = config
        .gcp_access_token
        .clone()
        .context("GCP_ACCESS_TOKEN must be set")?;
    let backend = GcpBilling::new(token).context("Failed to build Cloud Billing client")?;

    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState {
        config,
        backend: Arc::new(backend),
        notifier,
    });

    run_server(state, &addr).await
}
