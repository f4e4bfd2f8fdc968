//! Form server lifecycle — starts/stops the axum HTTP server that
//! serves the submission form and its JSON endpoints.
//!
//! Pattern: bind → spawn background task → return handle with
//! shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::form_router;
use crate::core_state::CoreState;
use crate::gateway::RecordsGateway;

/// Handle to a running form server.
pub struct FormServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FormServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Form server shutdown signal sent");
        }
    }
}

/// Start the form server on the given address.
///
/// Binds, builds the router, and spawns the axum server in a
/// background tokio task. Pass port 0 to pick an ephemeral port
/// (the bound address is on the returned handle).
pub async fn start(
    core: Arc<CoreState>,
    gateway: Arc<RecordsGateway>,
    addr: SocketAddr,
) -> Result<FormServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind form server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "Form server binding");

    let app = form_router(core, gateway);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Form server received shutdown signal");
        };

        tracing::info!(%addr, "Form server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Form server error: {e}");
        }

        tracing::info!("Form server stopped");
    });

    Ok(FormServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
