pub mod api;
pub mod config;
pub mod core_state;
pub mod form;
pub mod gateway;
pub mod models;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub async fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Aftercare starting v{}", config::APP_VERSION);

    let core = Arc::new(core_state::CoreState::new());
    let gateway = Arc::new(gateway::RecordsGateway::from_config());
    tracing::info!(endpoint = gateway.endpoint(), "Records gateway configured");

    let mut server = api::server::start(core, gateway, config::bind_addr())
        .await
        .expect("error while starting Aftercare");

    tracing::info!("Form available at http://{}/", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    tracing::info!("Shutdown requested");
    server.shutdown();
}
