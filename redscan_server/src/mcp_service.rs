//! # Redscan MCP Service
//!
//! Exposes the tool catalog over the Model Context Protocol. Each catalog
//! entry maps to one MCP tool whose input schema is generated from the
//! corresponding parameter struct in `redscan_tools`, so the schema the
//! client sees and the validation the builder applies can never drift apart.
//!
//! `call_tool` delegates to [`RedscanMcpService::dispatch_tool`], which is a
//! plain async method so tests can drive the dispatch table without a
//! protocol transport. Tool failures follow the same policy as the HTTP
//! surface: bad parameters are protocol errors, a failed or timed-out scan
//! is ordinary result content.

use redscan_core::{CommandExecutor, ExecOutcome};
use redscan_tools::{
    DirbParams, Enum4linuxParams, GobusterParams, HydraParams, JohnParams, NiktoParams,
    NmapParams, NucleiParams, PingParams, SqlmapParams, ToolCommand, WpscanParams,
};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool, ToolsCapability,
    },
    service::{RequestContext, RoleServer},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Generates an MCP input schema from a parameter struct. Field doc
/// comments become the property descriptions.
fn input_schema_for<T: JsonSchema>() -> Arc<Map<String, Value>> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(Map::new()),
    }
}

fn tool(name: &'static str, description: &'static str, schema: Arc<Map<String, Value>>) -> Tool {
    Tool {
        name: name.into(),
        title: Some(name.to_string()),
        icons: None,
        description: Some(description.into()),
        input_schema: schema,
        output_schema: None,
        annotations: None,
        meta: None,
    }
}

/// Input schema for the raw `execute_command` tool, which takes a free-form
/// command line rather than a parameter struct.
fn execute_command_schema() -> Arc<Map<String, Value>> {
    let mut properties = Map::new();
    properties.insert(
        "command".to_string(),
        serde_json::json!({
            "type": "string",
            "description": "Full shell command line to execute"
        }),
    );
    properties.insert(
        "timeout_seconds".to_string(),
        serde_json::json!({
            "type": "integer",
            "description": "Per-call timeout in seconds (optional; server default applies when omitted)"
        }),
    );

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String("command".to_string())]),
    );
    Arc::new(schema)
}

/// MCP server handler backed by the shared command executor.
#[derive(Clone)]
pub struct RedscanMcpService {
    executor: Arc<CommandExecutor>,
}

impl RedscanMcpService {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self { executor }
    }

    /// The full tool catalog, in registration order.
    pub fn catalog(&self) -> Vec<Tool> {
        vec![
            tool(
                "nmap_scan",
                "Run an nmap port scan against a target host or network range.",
                input_schema_for::<NmapParams>(),
            ),
            tool(
                "gobuster_scan",
                "Enumerate directories, DNS subdomains, or virtual hosts with gobuster.",
                input_schema_for::<GobusterParams>(),
            ),
            tool(
                "dirb_scan",
                "Brute-force web content paths with dirb.",
                input_schema_for::<DirbParams>(),
            ),
            tool(
                "nikto_scan",
                "Scan a web server for known vulnerabilities and misconfigurations with nikto.",
                input_schema_for::<NiktoParams>(),
            ),
            tool(
                "sqlmap_scan",
                "Test a URL (and optional POST body) for SQL injection with sqlmap.",
                input_schema_for::<SqlmapParams>(),
            ),
            tool(
                "hydra_attack",
                "Run an online password attack against a network service with hydra.",
                input_schema_for::<HydraParams>(),
            ),
            tool(
                "john_crack",
                "Crack password hashes offline with John the Ripper.",
                input_schema_for::<JohnParams>(),
            ),
            tool(
                "wpscan_analyze",
                "Audit a WordPress site for vulnerable plugins, themes, and users with wpscan.",
                input_schema_for::<WpscanParams>(),
            ),
            tool(
                "enum4linux_scan",
                "Enumerate SMB shares, users, and policies on a Windows/Samba host with enum4linux.",
                input_schema_for::<Enum4linuxParams>(),
            ),
            tool(
                "ping",
                "Check basic reachability of a host with ICMP echo requests.",
                input_schema_for::<PingParams>(),
            ),
            tool(
                "nuclei_scan",
                "Run template-based vulnerability checks against a target with nuclei.",
                input_schema_for::<NucleiParams>(),
            ),
            tool(
                "execute_command",
                "Execute an arbitrary shell command line and return its full output. \
                 Prefer the dedicated tool entries when one fits.",
                execute_command_schema(),
            ),
        ]
    }

    fn parse_args<P: DeserializeOwned>(arguments: &Map<String, Value>) -> Result<P, McpError> {
        serde_json::from_value(Value::Object(arguments.clone()))
            .map_err(|e| McpError::invalid_params(format!("invalid arguments: {e}"), None))
    }

    async fn run_catalog_tool<P>(&self, arguments: &Map<String, Value>) -> Result<CallToolResult, McpError>
    where
        P: ToolCommand + DeserializeOwned,
    {
        let params: P = Self::parse_args(arguments)?;
        let command = params
            .command_line()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        self.run_command(&command, None).await
    }

    async fn run_command(
        &self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .executor
            .execute(command, timeout)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(
            format_outcome(&outcome),
        )]))
    }

    /// Resolves a tool name and runs it. Exposed separately from the
    /// protocol handler so it can be tested directly.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = name, "MCP tool call");
        match name {
            "nmap_scan" => self.run_catalog_tool::<NmapParams>(&arguments).await,
            "gobuster_scan" => self.run_catalog_tool::<GobusterParams>(&arguments).await,
            "dirb_scan" => self.run_catalog_tool::<DirbParams>(&arguments).await,
            "nikto_scan" => self.run_catalog_tool::<NiktoParams>(&arguments).await,
            "sqlmap_scan" => self.run_catalog_tool::<SqlmapParams>(&arguments).await,
            "hydra_attack" => self.run_catalog_tool::<HydraParams>(&arguments).await,
            "john_crack" => self.run_catalog_tool::<JohnParams>(&arguments).await,
            "wpscan_analyze" => self.run_catalog_tool::<WpscanParams>(&arguments).await,
            "enum4linux_scan" => self.run_catalog_tool::<Enum4linuxParams>(&arguments).await,
            "ping" => self.run_catalog_tool::<PingParams>(&arguments).await,
            "nuclei_scan" => self.run_catalog_tool::<NucleiParams>(&arguments).await,
            "execute_command" => {
                let command = arguments
                    .get("command")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        McpError::invalid_params("'command' parameter is required", None)
                    })?;
                let timeout = arguments
                    .get("timeout_seconds")
                    .and_then(Value::as_u64)
                    .map(Duration::from_secs);
                self.run_command(command, timeout).await
            }
            other => Err(McpError::invalid_params(
                format!("unknown tool '{other}'"),
                None,
            )),
        }
    }
}

/// Renders an execution outcome as the text content of a tool result.
fn format_outcome(outcome: &ExecOutcome) -> String {
    if outcome.success {
        let mut text = String::new();
        if outcome.partial_results {
            text.push_str("[command timed out; partial results below]\n");
        }
        if outcome.stdout.is_empty() && outcome.stderr.is_empty() {
            text.push_str("Command completed with no output.");
        } else {
            text.push_str(&outcome.stdout);
            if !outcome.stderr.is_empty() {
                if !outcome.stdout.is_empty() {
                    text.push('\n');
                }
                text.push_str("stderr:\n");
                text.push_str(&outcome.stderr);
            }
        }
        text
    } else if outcome.timed_out {
        "Command timed out before producing any output.".to_string()
    } else {
        let mut text = format!("Command failed with exit code {}.", outcome.return_code);
        if !outcome.stdout.is_empty() {
            text.push_str("\nstdout:\n");
            text.push_str(&outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            text.push_str("\nstderr:\n");
            text.push_str(&outcome.stderr);
        }
        text
    }
}

impl ServerHandler for RedscanMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some(env!("CARGO_PKG_NAME").to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Security scanning tools for authorized assessments. A failed or \
                 timed-out scan is reported in the result text, not as a protocol error."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: self.catalog(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let arguments = params.arguments.unwrap_or_default();
            self.dispatch_tool(params.name.as_ref(), arguments).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redscan_core::ExecConfig;

    fn service() -> RedscanMcpService {
        RedscanMcpService::new(Arc::new(CommandExecutor::new(ExecConfig::default())))
    }

    #[test]
    fn catalog_covers_every_tool_once() {
        let catalog = service().catalog();
        let mut names: Vec<&str> = catalog.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "dirb_scan",
                "enum4linux_scan",
                "execute_command",
                "gobuster_scan",
                "hydra_attack",
                "john_crack",
                "nikto_scan",
                "nmap_scan",
                "nuclei_scan",
                "ping",
                "sqlmap_scan",
                "wpscan_analyze",
            ]
        );
    }

    #[test]
    fn schemas_describe_object_parameters() {
        for tool in service().catalog() {
            assert_eq!(
                tool.input_schema.get("type").and_then(Value::as_str),
                Some("object"),
                "{} schema must be an object",
                tool.name
            );
        }
    }

    #[tokio::test]
    async fn execute_command_returns_output_text() {
        let mut args = Map::new();
        args.insert(
            "command".to_string(),
            Value::String("echo from-mcp".to_string()),
        );
        let result = service().dispatch_tool("execute_command", args).await.unwrap();
        let text = result
            .content
            .iter()
            .find_map(|c| c.as_text().map(|t| t.text.clone()))
            .unwrap_or_default();
        assert!(text.contains("from-mcp"));
    }

    #[tokio::test]
    async fn execute_command_requires_a_command() {
        let err = service()
            .dispatch_tool("execute_command", Map::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("command"));
    }

    #[tokio::test]
    async fn unknown_tool_is_an_invalid_params_error() {
        let err = service()
            .dispatch_tool("metasploit", Map::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("unknown tool"));
    }

    #[tokio::test]
    async fn invalid_catalog_parameters_are_protocol_errors() {
        let mut args = Map::new();
        args.insert(
            "target".to_string(),
            Value::String("10.0.0.5; id".to_string()),
        );
        let err = service().dispatch_tool("nmap_scan", args).await.unwrap_err();
        assert!(err.message.contains("target"));
    }

    #[test]
    fn failed_outcome_formats_exit_code_and_stderr() {
        let outcome = ExecOutcome {
            stdout: String::new(),
            stderr: "connection refused\n".to_string(),
            return_code: 1,
            success: false,
            timed_out: false,
            partial_results: false,
        };
        let text = format_outcome(&outcome);
        assert!(text.contains("exit code 1"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn partial_outcome_is_flagged_in_the_text() {
        let outcome = ExecOutcome {
            stdout: "22/tcp open ssh\n".to_string(),
            stderr: String::new(),
            return_code: -1,
            success: true,
            timed_out: true,
            partial_results: true,
        };
        let text = format_outcome(&outcome);
        assert!(text.contains("partial results"));
        assert!(text.contains("22/tcp open ssh"));
    }
}
