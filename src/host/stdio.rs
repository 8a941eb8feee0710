//! Stdin/stdout JSON bridge for the alarm tools.
//!
//! Reads newline-delimited JSON [`ToolCall`] messages, dispatches them
//! through a [`ToolRegistry`], and writes [`ToolResponse`] and [`EventLine`]
//! messages as newline-delimited JSON.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, mpsc};

use crate::alarm::AlarmEvent;
use crate::error::{AlarmError, Result};
use crate::tools::ToolRegistry;

use super::protocol::{EventLine, LIST_TOOLS, PARSE_ERROR, ToolCall, ToolResponse};

type SharedWriter<W> = Arc<Mutex<W>>;

/// Run the bridge over the process's stdin and stdout until stdin closes.
pub async fn run_stdio_bridge(
    registry: ToolRegistry,
    events: mpsc::UnboundedReceiver<AlarmEvent>,
) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(reader, writer, registry, events).await
}

/// Run the bridge over arbitrary streams until `reader` reaches EOF.
///
/// Two tasks operate concurrently:
///
/// 1. **Reader**: reads one call per line, dispatches it, and writes the
///    response.
/// 2. **Event forwarder**: drains `events` and writes each as an
///    `{"event": ...}` line.
///
/// Both share one writer so lines never interleave.
pub async fn run_bridge<R, W>(
    reader: R,
    writer: W,
    registry: ToolRegistry,
    mut events: mpsc::UnboundedReceiver<AlarmEvent>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(writer));

    let event_writer = Arc::clone(&writer);
    let event_handle = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(alarm_id = event.alarm_id(), "forwarding alarm event");
            let line = EventLine { event };
            if let Err(e) = write_json(&event_writer, &line).await {
                tracing::warn!(error = %e, "failed to write alarm event; stopping event forwarder");
                break;
            }
        }
    });

    let reader_result = run_reader(reader, &writer, &registry).await;

    event_handle.abort();
    let _ = event_handle.await;

    reader_result
}

async fn run_reader<R, W>(
    mut reader: R,
    writer: &SharedWriter<W>,
    registry: &ToolRegistry,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("stdin closed (EOF); shutting down alarm bridge");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolCall>(trimmed) {
            Ok(call) => handle_call(registry, call),
            Err(e) => {
                tracing::warn!(error = %e, raw_line = %trimmed, "failed to parse tool call");
                ToolResponse::error(None, PARSE_ERROR, format!("failed to parse tool call: {e}"))
            }
        };
        write_json(writer, &response).await?;
    }
}

/// Dispatch one call, answering [`LIST_TOOLS`] from the registry itself.
pub fn handle_call(registry: &ToolRegistry, call: ToolCall) -> ToolResponse {
    if call.tool == LIST_TOOLS {
        return ToolResponse::ok(call.id, serde_json::Value::Array(registry.schemas_for_api()));
    }
    let outcome = registry.dispatch(&call.tool, call.arguments);
    if let Err(e) = &outcome {
        tracing::warn!(tool = %call.tool, error = %e, "tool call failed");
    }
    ToolResponse::from_outcome(call.id, outcome)
}

async fn write_json<W, T>(writer: &SharedWriter<W>, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut json = serde_json::to_string(value)
        .map_err(|e| AlarmError::Serialization(format!("failed to serialize line: {e}")))?;
    json.push('\n');
    let mut w = writer.lock().await;
    w.write_all(json.as_bytes()).await?;
    w.flush().await?;
    Ok(())
}
