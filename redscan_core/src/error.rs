//! Error types for the execution engine.
//!
//! Only failures to start a process at all surface as [`ExecError`]; every
//! outcome of a process that did start (non-zero exit, timeout, signal
//! death) is reported inside [`crate::ExecOutcome`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    /// The caller passed an empty or whitespace-only command line.
    #[error("command must not be empty")]
    EmptyCommand,

    /// The shell could not be spawned (missing interpreter, permission
    /// denied, pipe setup failure). This signals an environment problem,
    /// not a tool failure.
    #[error("failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    /// A captured pipe handle was unexpectedly absent after spawn.
    #[error("child process {0} pipe was not captured")]
    MissingPipe(&'static str),
}

pub type Result<T> = std::result::Result<T, ExecError>;
