//! Command-line builders for the supported tool catalog.
//!
//! Each tool gets a parameter struct that derives `Deserialize` (for the
//! HTTP and MCP transports) and `JsonSchema` (for MCP tool registration),
//! plus a `command_line` method that validates the fields and assembles the
//! final shell command string. Doc comments on fields double as the schema
//! descriptions clients see.

pub mod creds;
pub mod network;
pub mod web;

pub use creds::{HydraParams, JohnParams};
pub use network::{Enum4linuxParams, NmapParams, PingParams};
pub use web::{
    DirbParams, GobusterMode, GobusterParams, NiktoParams, NucleiParams, SqlmapParams,
    WpscanParams,
};

use crate::error::Result;

/// A validated tool invocation that can be rendered to a shell command line.
pub trait ToolCommand {
    /// Validates the parameters and assembles the command string, or reports
    /// the first parameter problem found.
    fn command_line(&self) -> Result<String>;
}
