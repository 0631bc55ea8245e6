//! JSONL workout log.
//!
//! [`EventLog`] is a [`Notifier`] that only queues events. A blocking
//! writer task drains the queue and appends one JSON line per event,
//! tagged with a sequence number, the wall-clock time and the event's
//! [`Cue`]. Session operations never wait on the file.

use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Cue, Notifier, WorkoutEvent};

#[derive(Debug, Serialize)]
struct LogLine<'a> {
    sequence: u64,
    timestamp: DateTime<Utc>,
    cue: Cue,
    #[serde(flatten)]
    event: &'a WorkoutEvent,
}

/// Queueing end of a JSONL workout log.
///
/// Events sent after the writer has failed are dropped.
#[derive(Debug, Clone)]
pub struct EventLog {
    tx: mpsc::UnboundedSender<WorkoutEvent>,
}

/// Writer task of an [`EventLog`].
#[derive(Debug)]
pub struct LogWriter {
    handle: JoinHandle<std::io::Result<u64>>,
}

impl EventLog {
    /// Starts a writer task appending to `writer`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<W>(writer: W) -> (Self, LogWriter)
    where
        W: Write + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<WorkoutEvent>();
        let handle = tokio::task::spawn_blocking(move || {
            let mut out = BufWriter::new(writer);
            let mut sequence = 0u64;
            while let Some(event) = rx.blocking_recv() {
                let line = LogLine {
                    sequence,
                    timestamp: Utc::now(),
                    cue: event.cue(),
                    event: &event,
                };
                serde_json::to_writer(&mut out, &line)?;
                out.write_all(b"\n")?;
                out.flush()?;
                sequence += 1;
            }
            out.flush()?;
            Ok(sequence)
        });
        (Self { tx }, LogWriter { handle })
    }

    /// Creates (or truncates) the file at `path` and starts writing to it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn create(path: &Path) -> std::io::Result<(Self, LogWriter)> {
        let file = std::fs::File::create(path)?;
        Ok(Self::spawn(file))
    }
}

impl Notifier for EventLog {
    fn notify(&self, event: &WorkoutEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!("event log writer stopped");
        }
    }
}

impl LogWriter {
    /// Waits until every [`EventLog`] handle is dropped and the queue is
    /// written out. Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Returns the first write error, or an error if the task panicked.
    pub async fn finish(self) -> std::io::Result<u64> {
        self.handle.await.map_err(std::io::Error::other)?
    }
}
