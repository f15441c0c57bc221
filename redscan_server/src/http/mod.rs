//! The HTTP REST surface.
//!
//! Every endpoint is a thin adapter: deserialize the request body into a
//! tool parameter struct, let the builder validate it into a command line,
//! hand that to the shared [`CommandExecutor`], and return the structured
//! outcome as JSON. Validation failures are the caller's fault (400);
//! failures to start a process are the environment's fault (500); everything
//! a started process does, including dying, is a 200 with the details in the
//! body.

pub mod handlers;
pub mod streaming;

use crate::error::{Result, ServerError};
use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use redscan_core::CommandExecutor;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<CommandExecutor>,
}

impl AppState {
    pub fn new(executor: CommandExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }
}

/// Builds the full route table.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/command", post(handlers::generic_command))
        .route("/api/stream/command", post(streaming::stream_command_sse))
        .route("/api/tools/nmap", post(handlers::nmap))
        .route("/api/tools/gobuster", post(handlers::gobuster))
        .route("/api/tools/dirb", post(handlers::dirb))
        .route("/api/tools/nikto", post(handlers::nikto))
        .route("/api/tools/sqlmap", post(handlers::sqlmap))
        .route("/api/tools/hydra", post(handlers::hydra))
        .route("/api/tools/john", post(handlers::john))
        .route("/api/tools/wpscan", post(handlers::wpscan))
        .route("/api/tools/enum4linux", post(handlers::enum4linux))
        .route("/api/tools/ping", post(handlers::ping))
        .route("/api/tools/nuclei", post(handlers::nuclei))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and serves requests until the process is stopped.
pub async fn start_http_server(host: &str, port: u16, state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|_| ServerError::BindAddress(format!("{host}:{port}")))?;

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP API listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
