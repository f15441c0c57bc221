//! # Redscan Core
//!
//! This crate is the bounded command-execution engine used by the redscan
//! server. Its single responsibility is process supervision: run an already
//! assembled shell command line as a child process, drain both of its output
//! pipes concurrently, enforce a deadline, and report a structured outcome.
//!
//! ## Core Components
//!
//! - **`CommandExecutor`**: buffered execution. Runs a command to completion
//!   or to deadline and returns an [`ExecOutcome`] with the full captured
//!   stdout/stderr, the exit code, and the timeout bookkeeping flags.
//! - **`stream_command`**: incremental execution. Pushes a [`StreamEvent`]
//!   per output line to a subscriber as the process runs, closing the
//!   sequence with exactly one terminal event.
//! - **`ExecConfig`**: the operator-supplied default timeout, constructed
//!   once at startup and handed to every executor instance.
//!
//! ## Trust Boundary
//!
//! Commands are executed through `sh -c`, so shell metacharacters in the
//! command line behave exactly as the caller built them. This crate performs
//! no sanitization; everything upstream (the tool builders in
//! `redscan_tools`) is responsible for keeping attacker-controlled input out
//! of the command string.
//!
//! ## Failure Model
//!
//! Only a failure to start the process at all (missing shell, pipe setup) is
//! an error. A non-zero exit, a timeout, or death by signal are ordinary
//! outcomes represented inside [`ExecOutcome`]: a failed scan is data, not
//! an exception.

pub mod config;
pub mod error;
pub mod executor;
pub mod stream;

pub use config::{DEFAULT_COMMAND_TIMEOUT, ExecConfig};
pub use error::ExecError;
pub use executor::{CommandExecutor, ExecOutcome};
pub use stream::{StreamEvent, StreamEventKind, stream_command};
