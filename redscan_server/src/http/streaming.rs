//! Server-Sent Events endpoint for incremental command output.
//!
//! One request spawns one streaming execution; the SSE stream carries one
//! JSON event per output line and ends with the terminal event. There is no
//! server-side deadline here: the run lasts until the process finishes or
//! the client disconnects, at which point the drop guard cancels the token
//! and the process group is killed.

use super::handlers::{ApiError, CommandRequest, parse_params};
use axum::{
    Json,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use futures::StreamExt;
use serde_json::Value;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Events buffered between the execution task and the SSE encoder. Line
/// production can outpace slow clients briefly; past this bound the readers
/// apply backpressure to the child's pipes.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// POST /api/stream/command
pub(crate) async fn stream_command_sse(
    Json(body): Json<Value>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let request: CommandRequest = parse_params(body)?;
    let command = request.command()?.to_string();

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    // Dropped together with the SSE stream on client disconnect, which
    // cancels the execution and kills the process group.
    let disconnect_guard = cancel.clone().drop_guard();

    tokio::spawn(async move {
        redscan_core::stream_command(&command, tx, cancel).await;
    });

    let stream = ReceiverStream::new(rx).map(move |event| {
        let _held_until_disconnect = &disconnect_guard;
        let sse_event = Event::default().json_data(&event).unwrap_or_else(|e| {
            tracing::error!("failed to serialize stream event: {e}");
            Event::default().data("{}")
        });
        Ok::<_, Infallible>(sse_event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
