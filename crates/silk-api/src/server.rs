//! Server assembly and lifecycle.

use silk_core::{Error, Result};

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Run the Silkflow server until shutdown.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let bind_addr = config.http.bind_addr;
    let state = AppState::new(config)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| Error::Transport(format!("failed to bind {bind_addr}: {e}")))?;

    tracing::info!(%bind_addr, "silkflow server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Transport(e.to_string()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
