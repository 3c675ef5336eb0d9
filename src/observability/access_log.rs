//! Access logging.
//!
//! # Responsibilities
//! - Define the per-request log entry handed over by the proxy layer
//! - Format one combined-log style line per entry
//! - Write lines on a background task so the request path never blocks on I/O
//!
//! # Design Decisions
//! - Bounded queue: when the writer falls behind, new lines are dropped and
//!   counted instead of applying back-pressure to requests
//! - Output is buffered and flushed whenever the queue drains
//! - `stop` closes the queue, writes what is left and shuts the writer down

use std::borrow::Cow;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::AccessLogConfig;
use crate::observability::metrics;

const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Metadata of one completed request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEntry {
    pub now: DateTime<Utc>,
    pub backend_duration: Duration,
    pub total_duration: Duration,
    pub backend_key: String,
    pub remote_addr: String,
    pub method: String,
    pub path: String,
    pub proto: String,
    pub referer: String,
    pub user_agent: String,
    pub request_id_header: String,
    pub request_id: String,
    pub status_code: u16,
    pub content_length: i64,
}

fn client_ip(remote_addr: &str) -> Cow<'_, str> {
    if remote_addr.is_empty() {
        return Cow::Borrowed("-");
    }
    match remote_addr.parse::<SocketAddr>() {
        Ok(addr) => Cow::Owned(addr.ip().to_string()),
        Err(_) => Cow::Borrowed(remote_addr),
    }
}

/// Format `entry` as a single newline-terminated line.
pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "{} - - [{}] \"{} {} {}\" {} {} \"{}\" \"{}\" \"{}:{}\" \"{}\" {:.3} {:.3}\n",
        client_ip(&entry.remote_addr),
        entry.now.format(TIME_FORMAT),
        entry.method,
        entry.path,
        entry.proto,
        entry.status_code,
        entry.content_length,
        entry.referer,
        entry.user_agent,
        entry.request_id_header,
        entry.request_id,
        entry.backend_key,
        entry.backend_duration.as_secs_f64(),
        entry.total_duration.as_secs_f64(),
    )
}

/// Buffered asynchronous access logger.
pub struct AccessLogger {
    sender: ArcSwapOption<mpsc::Sender<LogEntry>>,
    writer: Mutex<Option<JoinHandle<io::Result<()>>>>,
}

impl AccessLogger {
    /// Spawn a logger writing to `writer`, queueing at most `buffer_size` lines.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<W>(writer: W, buffer_size: usize) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        let handle = tokio::spawn(write_loop(rx, writer));
        Self {
            sender: ArcSwapOption::from_pointee(tx),
            writer: Mutex::new(Some(handle)),
        }
    }

    pub fn stdout(buffer_size: usize) -> Self {
        Self::new(tokio::io::stdout(), buffer_size)
    }

    pub fn stderr(buffer_size: usize) -> Self {
        Self::new(tokio::io::stderr(), buffer_size)
    }

    /// Append to the file at `path`, creating it if needed.
    pub async fn file(path: impl AsRef<Path>, buffer_size: usize) -> io::Result<Self> {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self::new(file, buffer_size))
    }

    /// Build the logger described by `config`, or `None` if logging is off.
    pub async fn from_config(config: &AccessLogConfig) -> io::Result<Option<Self>> {
        let logger = match config.destination.as_str() {
            "" | "none" => return Ok(None),
            "stdout" => Self::stdout(config.buffer_size),
            "stderr" => Self::stderr(config.buffer_size),
            path => Self::file(path, config.buffer_size).await?,
        };
        tracing::info!(
            destination = %config.destination,
            buffer_size = config.buffer_size,
            "Access log enabled"
        );
        Ok(Some(logger))
    }

    /// Queue `entry` for writing. Never blocks; drops the entry if the queue
    /// is full or the logger has been stopped.
    pub fn log(&self, entry: LogEntry) {
        let guard = self.sender.load();
        let Some(tx) = &*guard else {
            tracing::debug!("Access log entry discarded: logger stopped");
            return;
        };
        match tx.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::record_access_log_dropped();
                tracing::warn!("Access log queue full, dropping entry");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Access log entry discarded: writer closed");
            }
        }
    }

    /// Close the queue and wait for queued lines to be written.
    /// Calling it again is a no-op.
    pub async fn stop(&self) {
        self.sender.store(None);
        let handle = self.writer.lock().await.take();
        if let Some(handle) = handle {
            match handle.await {
                Ok(Ok(())) => tracing::debug!("Access log writer stopped"),
                Ok(Err(e)) => tracing::error!(error = %e, "Access log writer failed"),
                Err(e) => tracing::error!(error = %e, "Access log writer task panicked"),
            }
        }
    }
}

async fn write_loop<W>(mut rx: mpsc::Receiver<LogEntry>, writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = BufWriter::new(writer);
    while let Some(entry) = rx.recv().await {
        out.write_all(format_entry(&entry).as_bytes()).await?;
        if rx.is_empty() {
            out.flush().await?;
        }
    }
    out.flush().await?;
    out.shutdown().await
}
