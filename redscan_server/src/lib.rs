//! # Redscan Server
//!
//! The transport layer of redscan: a REST API (with SSE streaming) and an
//! MCP stdio server, both fronting the same bounded command executor from
//! `redscan_core` and the same validated tool catalog from `redscan_tools`.
//!
//! The two surfaces share one policy: a request that cannot be validated or
//! started is rejected with an error, while everything a started scan does
//! (finish, fail, time out with partial output) comes back as ordinary
//! structured data.

pub mod error;
pub mod http;
pub mod mcp_service;
pub mod shell;
pub mod utils;

pub use error::{Result, ServerError};
pub use http::{AppState, build_router, start_http_server};
pub use mcp_service::RedscanMcpService;
