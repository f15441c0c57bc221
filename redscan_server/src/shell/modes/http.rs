//! HTTP mode: serve the REST API until interrupted.

use crate::http::{AppState, start_http_server};
use crate::shell::cli::Cli;
use anyhow::{Context, Result};
use redscan_core::{CommandExecutor, ExecConfig};

pub async fn run_http_mode(cli: &Cli, config: ExecConfig) -> Result<()> {
    let state = AppState::new(CommandExecutor::new(config));

    tokio::select! {
        result = start_http_server(&cli.host, cli.port, state) => {
            result.context("HTTP server failed")
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, stopping HTTP server");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
