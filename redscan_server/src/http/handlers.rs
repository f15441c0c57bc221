//! Request handlers for the buffered endpoints.

use super::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use redscan_core::{ExecError, ExecOutcome};
use redscan_tools::{
    DirbParams, Enum4linuxParams, GobusterParams, HydraParams, JohnParams, NiktoParams,
    NmapParams, NucleiParams, PingParams, SqlmapParams, ToolCommand, ToolError, WpscanParams,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// Binaries the health endpoint probes for.
const ESSENTIAL_TOOLS: &[&str] = &["nmap", "gobuster", "dirb", "nikto"];

/// How long a `which` probe may take before the tool counts as missing.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Uniform error body: `{"error": "..."}` with the status carrying the
/// blame (400 caller, 500 environment).
pub(crate) enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ExecError> for ApiError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::EmptyCommand => Self::BadRequest(err.to_string()),
            ExecError::Spawn(_) | ExecError::MissingPipe(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Deserializes a request body into a parameter struct, reporting shape
/// problems as a 400 rather than a transport-level rejection.
pub(crate) fn parse_params<P: DeserializeOwned>(value: Value) -> Result<P, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("invalid request: {e}")))
}

async fn run_tool<P: ToolCommand>(
    state: &AppState,
    params: &P,
) -> Result<Json<ExecOutcome>, ApiError> {
    let command = params.command_line()?;
    let outcome = state.executor.execute(&command, None).await?;
    Ok(Json(outcome))
}

/// Body of `/api/command` and `/api/stream/command`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommandRequest {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl CommandRequest {
    /// The command string, or a 400 when absent or blank.
    pub(crate) fn command(&self) -> Result<&str, ApiError> {
        match self.command.as_deref() {
            Some(command) if !command.trim().is_empty() => Ok(command),
            _ => Err(ApiError::BadRequest(
                "'command' parameter is required".to_string(),
            )),
        }
    }
}

/// POST /api/command: run an arbitrary command line under the default (or
/// per-request) timeout.
pub(crate) async fn generic_command(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ExecOutcome>, ApiError> {
    let request: CommandRequest = parse_params(body)?;
    let command = request.command()?;
    let timeout = request.timeout_seconds.map(Duration::from_secs);
    let outcome = state.executor.execute(command, timeout).await?;
    Ok(Json(outcome))
}

/// GET /health: liveness plus a probe for the essential scanner binaries.
pub(crate) async fn health(State(state): State<AppState>) -> Json<Value> {
    let mut tools_status = serde_json::Map::new();
    let mut all_available = true;

    for tool in ESSENTIAL_TOOLS {
        let available = match state
            .executor
            .execute(&format!("which {tool}"), Some(PROBE_TIMEOUT))
            .await
        {
            Ok(outcome) => outcome.return_code == 0,
            Err(e) => {
                tracing::warn!("health probe for {tool} failed to run: {e}");
                false
            }
        };
        all_available &= available;
        tools_status.insert((*tool).to_string(), Value::Bool(available));
    }

    let message = if all_available {
        "All essential tools are available".to_string()
    } else {
        let missing: Vec<&str> = ESSENTIAL_TOOLS
            .iter()
            .filter(|t| tools_status.get(**t) == Some(&Value::Bool(false)))
            .copied()
            .collect();
        format!("Missing essential tools: {}", missing.join(", "))
    };

    Json(json!({
        "status": if all_available { "healthy" } else { "degraded" },
        "message": message,
        "tools_status": tools_status,
        "all_essential_tools_available": all_available,
    }))
}

macro_rules! tool_handler {
    ($name:ident, $params:ty) => {
        pub(crate) async fn $name(
            State(state): State<AppState>,
            Json(body): Json<Value>,
        ) -> Result<Json<ExecOutcome>, ApiError> {
            let params: $params = parse_params(body)?;
            run_tool(&state, &params).await
        }
    };
}

tool_handler!(nmap, NmapParams);
tool_handler!(gobuster, GobusterParams);
tool_handler!(dirb, DirbParams);
tool_handler!(nikto, NiktoParams);
tool_handler!(sqlmap, SqlmapParams);
tool_handler!(hydra, HydraParams);
tool_handler!(john, JohnParams);
tool_handler!(wpscan, WpscanParams);
tool_handler!(enum4linux, Enum4linuxParams);
tool_handler!(ping, PingParams);
tool_handler!(nuclei, NucleiParams);
