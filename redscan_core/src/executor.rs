//! Buffered command execution.
//!
//! One execution spawns exactly one child process (via `sh -c`, in its own
//! process group) plus two concurrent reader tasks, one per output pipe.
//! Both readers must run regardless of which pipe the child favors: OS pipe
//! buffers are bounded, and a child blocked writing to an undrained pipe
//! would deadlock the whole execution. The readers append whole lines into a
//! shared accumulator pair behind a single lock and finish only at
//! end-of-stream, which the kill path guarantees by closing the pipes.

use crate::config::ExecConfig;
use crate::error::ExecError;
use serde::Serialize;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Terminal outcome of one buffered execution.
///
/// Field names match the wire format the HTTP and MCP transports expose.
#[derive(Debug, Clone, Serialize)]
pub struct ExecOutcome {
    /// Accumulated standard output, newline-joined.
    pub stdout: String,
    /// Accumulated standard error, newline-joined.
    pub stderr: String,
    /// Process exit code, or -1 when the process was killed on timeout or
    /// died to a signal.
    pub return_code: i32,
    /// True for a clean zero exit, and also for a timeout that still
    /// produced output: partial scan output is salvageable data, so a
    /// timed-out-but-talkative tool counts as a usable success.
    pub success: bool,
    /// The deadline fired before the process finished.
    pub timed_out: bool,
    /// `timed_out` and at least one of stdout/stderr is non-empty.
    pub partial_results: bool,
}

/// Which pipe a drain task is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PipeKind {
    Stdout,
    Stderr,
}

/// The per-execution accumulator pair. Mutated concurrently by the two drain
/// tasks, hence the shared lock; never shared across executions.
#[derive(Debug, Default)]
struct OutputBuffers {
    stdout: String,
    stderr: String,
}

/// Builds the `sh -c` invocation for a command line, with both output pipes
/// captured and the child placed in its own process group so a timeout kill
/// also reaches any helper processes the tool spawned.
pub(crate) fn shell_command(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);
    cmd
}

/// Sends SIGKILL to the child's whole process group.
///
/// The child was spawned with `process_group(0)`, so its pid doubles as the
/// pgid. Grandchildren (e.g. a scanner's helper binaries) die with it and
/// the pipes reach end-of-stream, which unblocks the drain tasks.
#[cfg(unix)]
pub(crate) fn kill_process_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            tracing::debug!("killpg({pid}) failed: {e}");
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn kill_process_group(_child: &Child) {
    // No process groups; Child::kill handles the direct child.
}

fn drain_pipe<R>(
    reader: R,
    buffers: Arc<Mutex<OutputBuffers>>,
    pipe: PipeKind,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let mut buf = buffers.lock().unwrap();
                    let target = match pipe {
                        PipeKind::Stdout => &mut buf.stdout,
                        PipeKind::Stderr => &mut buf.stderr,
                    };
                    target.push_str(&line);
                    target.push('\n');
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("{pipe:?} read error: {e}");
                    break;
                }
            }
        }
    })
}

/// Runs shell command lines under a deadline and reports structured
/// outcomes. Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    config: ExecConfig,
}

impl CommandExecutor {
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    /// The default timeout applied when `execute` is called without an
    /// override.
    pub fn default_timeout(&self) -> Duration {
        self.config.default_timeout
    }

    /// Runs `command_line` through the shell, draining both output pipes
    /// concurrently, and returns once the process has exited (or been
    /// killed at the deadline) and both pipes have been read to the end.
    ///
    /// `timeout` overrides the configured default for this call only.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] only when the process could not be started.
    /// Every outcome of a started process (non-zero exit, timeout, signal
    /// death) is reported inside the returned [`ExecOutcome`].
    pub async fn execute(
        &self,
        command_line: &str,
        timeout: Option<Duration>,
    ) -> Result<ExecOutcome, ExecError> {
        if command_line.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        let timeout = timeout.unwrap_or(self.config.default_timeout);

        tracing::info!(
            command = %command_line,
            timeout_secs = timeout.as_secs(),
            "executing command"
        );

        let mut child = shell_command(command_line)
            .spawn()
            .map_err(ExecError::Spawn)?;

        let stdout = child.stdout.take().ok_or(ExecError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(ExecError::MissingPipe("stderr"))?;

        let buffers = Arc::new(Mutex::new(OutputBuffers::default()));
        let stdout_task = drain_pipe(stdout, Arc::clone(&buffers), PipeKind::Stdout);
        let stderr_task = drain_pipe(stderr, Arc::clone(&buffers), PipeKind::Stderr);

        let (return_code, timed_out) = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => (status.code().unwrap_or(-1), false),
            Ok(Err(e)) => {
                tracing::warn!("wait on child process failed: {e}");
                (-1, false)
            }
            Err(_elapsed) => {
                // Deadline fired. The process may have exited in the same
                // instant; if so the natural-exit path wins and no timeout
                // is recorded.
                match child.try_wait() {
                    Ok(Some(status)) => (status.code().unwrap_or(-1), false),
                    _ => {
                        tracing::warn!(
                            command = %command_line,
                            timeout_secs = timeout.as_secs(),
                            "command timed out, killing process group"
                        );
                        kill_process_group(&child);
                        if let Err(e) = child.kill().await {
                            tracing::debug!("kill after timeout failed: {e}");
                        }
                        (-1, true)
                    }
                }
            }
        };

        // Let the drain tasks consume whatever was still buffered in the
        // pipes at exit/kill time before the outcome is assembled.
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let output = {
            let mut buf = buffers.lock().unwrap();
            std::mem::take(&mut *buf)
        };
        let has_output = !output.stdout.is_empty() || !output.stderr.is_empty();
        let success = return_code == 0 || (timed_out && has_output);

        Ok(ExecOutcome {
            stdout: output.stdout,
            stderr: output.stderr,
            return_code,
            success,
            timed_out,
            partial_results: timed_out && has_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> CommandExecutor {
        CommandExecutor::new(ExecConfig::default())
    }

    #[tokio::test]
    async fn echo_captures_stdout() {
        let outcome = executor().execute("echo hello", None).await.unwrap();
        assert_eq!(outcome.stdout, "hello\n");
        assert_eq!(outcome.stderr, "");
        assert_eq!(outcome.return_code, 0);
        assert!(outcome.success);
        assert!(!outcome.timed_out);
        assert!(!outcome.partial_results);
    }

    #[tokio::test]
    async fn silent_zero_exit_is_a_clean_success() {
        let outcome = executor().execute("true", None).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.stdout, "");
        assert_eq!(outcome.stderr, "");
        assert!(!outcome.timed_out);
        assert!(!outcome.partial_results);
    }

    #[tokio::test]
    async fn nonzero_exit_is_data_not_error() {
        let outcome = executor().execute("exit 5", None).await.unwrap();
        assert_eq!(outcome.return_code, 5);
        assert!(!outcome.success);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn unknown_command_reports_shell_failure() {
        // The shell itself starts fine, so this is an outcome, not an error.
        let outcome = executor()
            .execute("definitely-not-a-real-binary-xyz", None)
            .await
            .unwrap();
        assert_ne!(outcome.return_code, 0);
        assert!(!outcome.success);
        assert!(!outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let err = executor().execute("   ", None).await.unwrap_err();
        assert!(matches!(err, ExecError::EmptyCommand));
    }

    #[tokio::test]
    async fn stderr_is_kept_separate_from_stdout() {
        let outcome = executor()
            .execute("echo out; echo err 1>&2", None)
            .await
            .unwrap();
        assert_eq!(outcome.stdout, "out\n");
        assert_eq!(outcome.stderr, "err\n");
    }

    #[tokio::test]
    async fn outcome_serializes_with_wire_field_names() {
        let outcome = executor().execute("echo hi", None).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["stdout"], "hi\n");
        assert_eq!(json["return_code"], 0);
        assert_eq!(json["success"], true);
        assert_eq!(json["timed_out"], false);
        assert_eq!(json["partial_results"], false);
    }
}
