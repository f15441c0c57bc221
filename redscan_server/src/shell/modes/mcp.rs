//! MCP mode: serve the tool catalog over stdio.

use crate::mcp_service::RedscanMcpService;
use anyhow::{Context, Result};
use redscan_core::{CommandExecutor, ExecConfig};
use rmcp::ServiceExt;
use std::sync::Arc;

pub async fn run_mcp_mode(config: ExecConfig) -> Result<()> {
    let executor = Arc::new(CommandExecutor::new(config));
    let handler = RedscanMcpService::new(executor);

    let service = handler
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP stdio transport")?;

    tracing::info!("MCP server ready on stdio");
    let result = service.waiting().await;
    tracing::info!("MCP server stopped: {result:?}");
    Ok(())
}
