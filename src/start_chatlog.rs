//! Startup helpers for the chatlog server.

use std::process::ExitCode;

use crate::conversation::ChatlogConfig;
use crate::server::{self, AppState};

/// Run the server until Ctrl-C (used by the `chatlog-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting chatlog v{}", env!("CARGO_PKG_VERSION"));

    let config = match ChatlogConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::info!(
        backend = ?config.storage.backend,
        path = %config.storage.sqlite_path.display(),
        "storage selected"
    );

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(serve(config)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

async fn serve(config: ChatlogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(&config)
        .await
        .map_err(|e| format!("Failed to create state: {e}"))?;

    server::run_server_with_shutdown(state, &config.server, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
