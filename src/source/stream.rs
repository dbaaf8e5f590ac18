//! Stream-based data source.
//!
//! Receives heart-rate records from an async byte stream, such as a TCP
//! connection to a device bridge.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{DataSource, HeartRateRecord};

/// Shared slot for the last error seen by a background task.
pub(crate) type ErrorSlot = Arc<Mutex<Option<String>>>;

pub(crate) fn set_error(slot: &ErrorSlot, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

pub(crate) fn get_error(slot: &ErrorSlot) -> Option<String> {
    slot.lock().ok().and_then(|guard| guard.clone())
}

/// A data source that receives records from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// records and makes them available via `poll()`. The task is aborted when
/// the source is dropped.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use pulsewatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"heartRate\": 72, \"timestamp\": 1700000000000}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<HeartRateRecord>,
    description: String,
    last_error: ErrorSlot,
    task: JoinHandle<()>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line is parsed as one [`HeartRateRecord`]; lines that fail to
    /// parse are skipped.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let task = tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<HeartRateRecord>(trimmed) {
                            Ok(record) => {
                                set_error(&error_handle, None);
                                if tx.send(record).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => debug!("Skipping malformed record: {}", e),
                        }
                    }
                    Err(e) => {
                        warn!("Stream read failed: {}", e);
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
            task,
        }
    }

    /// Create a StreamSource from a raw bytes channel.
    ///
    /// Each message is parsed as one JSON record.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, record_rx) = mpsc::channel(64);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        let task = tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<HeartRateRecord>(&bytes) {
                    Ok(record) => {
                        set_error(&error_handle, None);
                        if tx.send(record).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!("Skipping malformed record: {}", e),
                }
            }
        });

        Self {
            receiver: record_rx,
            description: format!("stream: {}", description),
            last_error,
            task,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<HeartRateRecord> {
        match self.receiver.try_recv() {
            Ok(record) => Some(record),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if get_error(&self.last_error).is_none() {
                    set_error(&self.last_error, Some("Stream disconnected".to_string()));
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        get_error(&self.last_error)
    }
}

impl Drop for StreamSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
