//! Background audit writer: an mpsc-fed task appending JSON lines.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::entry::AuditEntry;

/// Channel buffer between producers and the background writer task.
const CHANNEL_BUFFER: usize = 1024;

/// Flush after this long without new entries.
const FLUSH_INTERVAL_SECS: u64 = 1;

/// Errors raised while opening or writing the audit file.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to create audit log directory: {0}")]
    CreateDir(std::io::Error),

    #[error("failed to open audit log file: {0}")]
    OpenFile(std::io::Error),

    #[error("failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write audit log: {0}")]
    Write(std::io::Error),

    #[error("failed to flush audit log: {0}")]
    Flush(std::io::Error),
}

/// Cheap, cloneable handle that submits entries to the background writer.
///
/// `AuditSink` is `Clone + Send + Sync`; request handlers hold clones and
/// never block on disk I/O.
#[derive(Clone)]
pub struct AuditSink {
    tx: mpsc::Sender<AuditEntry>,
}

impl AuditSink {
    /// Open (or create) the JSONL file at `path` in append mode, spawn the
    /// writer task, and return the sink with its join handle.
    ///
    /// The background task never panics: I/O errors are logged through
    /// `tracing::error` and the affected entry is dropped.  A final flush
    /// runs when the last sink clone is dropped and the channel closes.
    pub async fn start(
        path: impl AsRef<Path>,
    ) -> Result<(Self, JoinHandle<()>), AuditError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(AuditError::CreateDir)?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(AuditError::OpenFile)?;

        let (tx, rx) = mpsc::channel::<AuditEntry>(CHANNEL_BUFFER);
        let handle = tokio::spawn(run_writer_loop(file, rx));

        Ok((Self { tx }, handle))
    }

    /// Queue an entry for writing.
    ///
    /// Waits when the channel is full; if the writer task has already
    /// exited the entry is dropped with a warning.
    pub async fn log(&self, entry: AuditEntry) {
        if let Err(err) = self.tx.send(entry).await {
            tracing::warn!(
                event_type = ?err.0.event_type,
                "audit sink channel closed; entry dropped"
            );
        }
    }
}

/// Writer loop: drain entries, flush on idle, final flush on close.
async fn run_writer_loop(mut file: tokio::fs::File, mut rx: mpsc::Receiver<AuditEntry>) {
    let flush_interval = tokio::time::Duration::from_secs(FLUSH_INTERVAL_SECS);
    let mut dirty = false;

    loop {
        match tokio::time::timeout(flush_interval, rx.recv()).await {
            Ok(Some(entry)) => {
                if let Err(err) = append_line(&mut file, &entry).await {
                    tracing::error!(%err, "failed to write audit entry");
                } else {
                    dirty = true;
                }
            }
            Ok(None) => {
                if dirty {
                    if let Err(err) = file.flush().await {
                        tracing::error!(%err, "final audit flush failed");
                    }
                }
                tracing::debug!("audit writer task shutting down");
                return;
            }
            Err(_) => {
                if dirty {
                    if let Err(err) = file.flush().await {
                        tracing::error!(%err, "periodic audit flush failed");
                    } else {
                        dirty = false;
                    }
                }
            }
        }
    }
}

/// Serialize `entry` as one newline-terminated JSON object and append it.
async fn append_line(file: &mut tokio::fs::File, entry: &AuditEntry) -> Result<(), AuditError> {
    let mut line = serde_json::to_vec(entry)?;
    line.push(b'\n');
    file.write_all(&line).await.map_err(AuditError::Write)?;
    Ok(())
}
