//! # Redscan Tools
//!
//! The catalog layer: one parameter struct per supported security tool, each
//! knowing how to validate its inputs and render the final shell command
//! line the execution engine runs. This is where the trust boundary sits:
//! `redscan_core` executes whatever string it is handed, so every
//! caller-controlled value must pass through the allow-lists in
//! [`sanitize`] before it reaches a command string.
//!
//! The structs derive `schemars::JsonSchema` so the MCP transport can
//! publish their shapes directly, with field doc comments serving as the
//! parameter descriptions.

pub mod builders;
pub mod error;
pub mod sanitize;

pub use builders::{
    DirbParams, Enum4linuxParams, GobusterMode, GobusterParams, HydraParams, JohnParams,
    NiktoParams, NmapParams, NucleiParams, PingParams, SqlmapParams, ToolCommand, WpscanParams,
};
pub use error::ToolError;
