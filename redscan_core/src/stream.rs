//! Incremental execution: push each output line to a subscriber as it is
//! produced instead of buffering until completion.
//!
//! Two reader tasks (stdout, stderr) forward lines into a single mpsc sink,
//! which serializes delivery to the subscriber. Order within one stream is
//! preserved; interleaving between streams is whatever the OS scheduler
//! produced. The sequence ends with exactly one terminal event: `exit` with
//! the process exit code, or `error` if the process could not be started.
//!
//! Unlike the buffered path, no default deadline applies here: a streaming
//! run is bounded by the caller's [`CancellationToken`] (or the subscriber
//! dropping its receiver), at which point the process group is killed and
//! no further events are emitted.

use crate::executor::{kill_process_group, shell_command};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Discriminator for [`StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventKind {
    Stdout,
    Stderr,
    Exit,
    Error,
}

/// One event in a streaming execution.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub kind: StreamEventKind,
    /// The output line, a completion note, or an error message.
    pub data: String,
    pub timestamp: DateTime<Utc>,
    /// Present only on `exit` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl StreamEvent {
    fn line(kind: StreamEventKind, data: String) -> Self {
        Self {
            kind,
            data,
            timestamp: Utc::now(),
            exit_code: None,
        }
    }

    fn exit(code: i32) -> Self {
        Self {
            kind: StreamEventKind::Exit,
            data: "command completed".to_string(),
            timestamp: Utc::now(),
            exit_code: Some(code),
        }
    }

    fn error(message: String) -> Self {
        Self {
            kind: StreamEventKind::Error,
            data: message,
            timestamp: Utc::now(),
            exit_code: None,
        }
    }
}

fn forward_lines<R>(
    reader: R,
    kind: StreamEventKind,
    events: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => break,
                res = lines.next_line() => res,
            };
            match next {
                Ok(Some(line)) => {
                    if events.send(StreamEvent::line(kind, line)).await.is_err() {
                        // Subscriber went away; treat it as a cancellation so
                        // the supervising task kills the process.
                        cancel.cancel();
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!("{kind:?} read error: {e}");
                    break;
                }
            }
        }
    })
}

/// Runs `command_line` through the shell and forwards every output line to
/// `events` as it is read, closing with a single terminal event.
///
/// Returns once the process has finished and the terminal event has been
/// sent, or once `cancel` fires, in which case the process group is killed
/// and nothing further is emitted. A failure to start the process emits one
/// `error` event instead of a terminal `exit`.
pub async fn stream_command(
    command_line: &str,
    events: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) {
    tracing::info!(command = %command_line, "streaming command");

    let mut child = match shell_command(command_line).spawn() {
        Ok(child) => child,
        Err(e) => {
            let _ = events
                .send(StreamEvent::error(format!("failed to start command: {e}")))
                .await;
            return;
        }
    };

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        let _ = events
            .send(StreamEvent::error(
                "failed to capture command output pipes".to_string(),
            ))
            .await;
        kill_process_group(&child);
        let _ = child.kill().await;
        return;
    };

    let stdout_task = forward_lines(
        stdout,
        StreamEventKind::Stdout,
        events.clone(),
        cancel.clone(),
    );
    let stderr_task = forward_lines(
        stderr,
        StreamEventKind::Stderr,
        events.clone(),
        cancel.clone(),
    );

    let readers = async {
        let _ = stdout_task.await;
        let _ = stderr_task.await;
    };
    tokio::pin!(readers);

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!(command = %command_line, "streaming command cancelled, killing process group");
            kill_process_group(&child);
            if let Err(e) = child.kill().await {
                tracing::debug!("kill after cancellation failed: {e}");
            }
            // Let the readers observe end-of-stream; they emit nothing more
            // because the token is already cancelled.
            readers.await;
            return;
        }
        _ = &mut readers => {}
    }

    // Both pipes hit end-of-stream, but the process may still be running
    // with its output redirected or its descriptors closed, so the final
    // wait must stay cancellable too.
    let status = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!(
                command = %command_line,
                "streaming command cancelled after output closed, killing process group"
            );
            kill_process_group(&child);
            if let Err(e) = child.kill().await {
                tracing::debug!("kill after cancellation failed: {e}");
            }
            return;
        }
        status = child.wait() => status,
    };

    let code = match status {
        Ok(status) => status.code().unwrap_or(-1),
        Err(e) => {
            let _ = events
                .send(StreamEvent::error(format!("failed to wait for command: {e}")))
                .await;
            return;
        }
    };

    // A cancellation racing the natural end still suppresses the terminal
    // event: the subscriber asked to stop hearing from us.
    if cancel.is_cancelled() {
        return;
    }

    if events.send(StreamEvent::exit(code)).await.is_err() {
        tracing::debug!("subscriber dropped before exit event delivery");
    }
}
