//! # Redscan Server CLI
//!
//! Command-line interface definition and the main entry point.

use super::modes;
use crate::utils::logging::init_logging;
use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use redscan_core::ExecConfig;

/// Transport the server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// REST API with SSE streaming.
    Http,
    /// MCP server over stdio for direct agent integration.
    Mcp,
}

/// Redscan: security scanning tools behind an HTTP REST API or an MCP server.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "redscan runs in two modes:

1. HTTP Mode (default): REST API plus SSE command streaming.
   Example: redscan --mode http --port 5000

2. MCP Mode: Model Context Protocol server over stdio.
   Example: redscan --mode mcp"
)]
pub struct Cli {
    /// Server mode
    #[arg(long, value_enum, default_value_t = Mode::Http)]
    pub mode: Mode,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP server
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Default command timeout in seconds (0 means the built-in default)
    #[arg(long, default_value_t = 900)]
    pub timeout: u64,

    /// Enable debug-level logging
    #[arg(long)]
    pub debug: bool,

    /// Log to stderr instead of the daily log file
    #[arg(long)]
    pub log_to_stderr: bool,
}

/// Parses the CLI, initializes logging, and runs the selected mode to
/// completion.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    // MCP mode owns stdout for protocol frames, so file logging is the
    // default; --log-to-stderr opts into terminal output.
    init_logging(log_level, !cli.log_to_stderr)?;

    if cli.mode == Mode::Http && cli.host.trim().is_empty() {
        bail!("--host must not be empty");
    }

    let config = ExecConfig::with_timeout_secs(cli.timeout);
    tracing::info!(
        mode = ?cli.mode,
        timeout_secs = config.default_timeout.as_secs(),
        "starting redscan"
    );

    match cli.mode {
        Mode::Http => modes::run_http_mode(&cli, config).await,
        Mode::Mcp => modes::run_mcp_mode(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::parse_from(["redscan"]);
        assert_eq!(cli.mode, Mode::Http);
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 5000);
        assert_eq!(cli.timeout, 900);
        assert!(!cli.debug);
    }

    #[test]
    fn mcp_mode_parses() {
        let cli = Cli::parse_from(["redscan", "--mode", "mcp", "--timeout", "120"]);
        assert_eq!(cli.mode, Mode::Mcp);
        assert_eq!(cli.timeout, 120);
    }
}
