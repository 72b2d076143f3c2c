//! Alerty service entry point: config, logging, client wiring, HTTP server.

mod dashboard;
#[cfg(test)]
mod tests;

use alerty_client::{BackendClient, SessionStore};
use alerty_core::{AlertyConfig, AlertyResult};
use dashboard::AppState;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AlertyResult<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "alerty.toml".into());
    let cfg = AlertyConfig::load_or_default(Path::new(&config_path));

    // RUST_LOG wins; the config's log_level is the fallback filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level)),
        )
        .init();

    info!(backend = %cfg.backend.base_url, "Starting Alerty");

    let sessions = Arc::new(SessionStore::new());
    let client = Arc::new(BackendClient::new(&cfg.backend, sessions)?);
    let state = AppState::new(client, std::time::Duration::from_secs(cfg.cache.ttl_secs));

    dashboard::start_server(state, &cfg.server.bind_addr).await
}
