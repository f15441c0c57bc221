//! # Server Modes Module
//!
//! Contains the operational modes for the redscan server.

pub mod http;
pub mod mcp;

pub use http::run_http_mode;
pub use mcp::run_mcp_mode;
