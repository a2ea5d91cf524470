//! Line-oriented transport: one JSON `InboundEvent` per stdin line, one JSON
//! effect per stdout line.

use std::sync::Arc;

use quiz_core::model::CallbackId;
use serde::Serialize;
use services::{Dispatcher, InboundEvent, Outbound, Reply};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum OutputLine<'a> {
    Ack { callback_id: &'a CallbackId },
    Reply(&'a Reply),
}

/// Render one effect as a JSON line (without the trailing newline).
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn render(effect: &Outbound) -> Result<String, serde_json::Error> {
    let line = match effect {
        Outbound::Acknowledge(callback_id) => OutputLine::Ack { callback_id },
        Outbound::Reply(reply) => OutputLine::Reply(reply),
    };
    serde_json::to_string(&line)
}

/// Read events until EOF, dispatching each on its own task. Finished tasks are
/// reaped as input arrives; returns once every spawned task has finished.
///
/// # Errors
///
/// Returns `std::io::Error` if reading the input fails.
pub async fn read_events<R>(input: R, dispatcher: Arc<Dispatcher>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut tasks = JoinSet::new();
    let mut accepted = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundEvent>(line) {
            Ok(event) => {
                accepted += 1;
                let dispatcher = Arc::clone(&dispatcher);
                tasks.spawn(async move { dispatcher.dispatch(event).await });
            }
            Err(err) => tracing::warn!(error = %err, line, "skipping malformed event"),
        }
        reap_finished(&mut tasks);
    }

    while let Some(result) = tasks.join_next().await {
        log_join_error(result);
    }
    Ok(accepted)
}

/// Join every task that has already completed, without waiting.
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(result) = tasks.try_join_next() {
        log_join_error(result);
        reaped += 1;
    }
    reaped
}

fn log_join_error(result: Result<(), JoinError>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "event task failed");
    }
}

/// Write effects until every sender is dropped.
///
/// # Errors
///
/// Returns `std::io::Error` if writing the output fails.
pub async fn write_effects<W>(
    mut output: W,
    mut effects: mpsc::UnboundedReceiver<Outbound>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(effect) = effects.recv().await {
        match render(&effect) {
            Ok(line) => {
                output.write_all(line.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
            Err(err) => tracing::error!(error = %err, "failed to render effect"),
        }
    }
    Ok(())
}
