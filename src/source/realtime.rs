//! Realtime database subscription.
//!
//! Subscribes to one path of a Firebase-style realtime database through its
//! REST streaming API. The server keeps the response open and sends
//! `text/event-stream` events:
//!
//! ```text
//! event: put
//! data: {"path": "/", "data": {"heartRate": 72, "timestamp": 1700000000000}}
//!
//! event: patch
//! data: {"path": "/", "data": {"heartRate": 75}}
//!
//! event: keep-alive
//! data: null
//! ```
//!
//! Events are applied to a local copy of the value at the subscribed path
//! ([`RealtimeDocument`]); after every change the whole value is forwarded
//! as one [`HeartRateRecord`], mirroring a value listener.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::sse::{SseDecoder, SseEvent};
use super::stream::{get_error, set_error, ErrorSlot};
use super::{DataSource, HeartRateRecord};

/// Errors that end a realtime subscription or reject one of its events.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The database answered with a non-success status.
    #[error("Database returned status {0}")]
    Status(reqwest::StatusCode),

    /// An event carried a payload that is not `{path, data}`.
    #[error("Malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The server cancelled the subscription (e.g. security rules changed).
    #[error("Subscription cancelled: {0}")]
    Cancelled(String),

    /// The auth token expired or was revoked.
    #[error("Authentication revoked")]
    AuthRevoked,

    /// The server closed the event stream.
    #[error("Event stream closed")]
    Closed,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    path: String,
    data: Value,
}

/// Local copy of the value stored at the subscribed path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealtimeDocument {
    root: Value,
}

impl RealtimeDocument {
    /// The current value.
    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Replace the value at `path` (relative to the subscribed path).
    ///
    /// A `null` value deletes the child.
    pub fn put(&mut self, path: &str, data: Value) {
        put_at(&mut self.root, &split_path(path), data);
    }

    /// Merge the children of `data` into the value at `path`.
    pub fn patch(&mut self, path: &str, data: Value) {
        let Value::Object(children) = data else {
            self.put(path, data);
            return;
        };
        let base = path.trim_end_matches('/');
        for (key, value) in children {
            self.put(&format!("{}/{}", base, key), value);
        }
    }

    /// Apply one server-sent event.
    ///
    /// Returns `Ok(true)` when the value changed and `Ok(false)` for events
    /// that carry no data (keep-alives, unknown event names).
    pub fn apply(&mut self, event: &SseEvent) -> Result<bool, SourceError> {
        match event.event.as_str() {
            "put" => {
                let payload: EventPayload = serde_json::from_str(&event.data)?;
                self.put(&payload.path, payload.data);
                Ok(true)
            }
            "patch" => {
                let payload: EventPayload = serde_json::from_str(&event.data)?;
                self.patch(&payload.path, payload.data);
                Ok(true)
            }
            "cancel" => Err(SourceError::Cancelled(event.data.clone())),
            "auth_revoked" => Err(SourceError::AuthRevoked),
            _ => Ok(false),
        }
    }

    /// Interpret the current value as a heart-rate record.
    pub fn record(&self) -> Option<HeartRateRecord> {
        match serde_json::from_value(self.root.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Value at subscribed path is not a heart-rate record: {}", e);
                None
            }
        }
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Write `data` below `node`, turning non-object parents into objects.
fn put_at(node: &mut Value, segments: &[&str], data: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = data;
        return;
    };

    if !node.is_object() {
        if data.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Some(map) = node.as_object_mut() else {
        return;
    };

    if rest.is_empty() {
        if data.is_null() {
            map.remove(*first);
        } else {
            map.insert(first.to_string(), data);
        }
    } else {
        put_at(map.entry(first.to_string()).or_insert(Value::Null), rest, data);
    }
}

/// A data source backed by a live realtime database subscription.
///
/// The subscription runs in a background task for as long as the source
/// lives; dropping the source aborts the task and closes the connection.
#[derive(Debug)]
pub struct RealtimeSource {
    receiver: mpsc::Receiver<HeartRateRecord>,
    description: String,
    last_error: ErrorSlot,
    task: JoinHandle<()>,
}

impl RealtimeSource {
    /// Subscribe to `path` under the database at `base_url`.
    ///
    /// `auth` is passed as the `auth` query parameter when set. Must be
    /// called from within a tokio runtime.
    pub fn subscribe(
        client: reqwest::Client,
        base_url: &str,
        path: &str,
        auth: Option<String>,
    ) -> Self {
        let url = Self::endpoint(base_url, path);
        let (tx, rx) = mpsc::channel(64);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let task_url = url.clone();

        let task = tokio::spawn(async move {
            match run_subscription(client, &task_url, auth.as_deref(), tx).await {
                Ok(()) => debug!("Subscription to {} stopped: receiver dropped", task_url),
                Err(e) => {
                    warn!("Subscription to {} ended: {}", task_url, e);
                    set_error(&error_handle, Some(e.to_string()));
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("realtime: {}", url),
            last_error,
            task,
        }
    }

    /// REST streaming endpoint for a database path.
    pub fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}/{}.json", base_url.trim_end_matches('/'), path.trim_matches('/'))
    }
}

async fn run_subscription(
    client: reqwest::Client,
    url: &str,
    auth: Option<&str>,
    tx: mpsc::Sender<HeartRateRecord>,
) -> Result<(), SourceError> {
    let mut request = client.get(url).header(ACCEPT, "text/event-stream");
    if let Some(token) = auth {
        request = request.query(&[("auth", token)]);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(SourceError::Status(response.status()));
    }
    info!("Subscribed to {}", url);

    let mut decoder = SseDecoder::new();
    let mut document = RealtimeDocument::default();
    let mut body = Box::pin(response.bytes_stream());

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for event in decoder.push(&chunk) {
            match document.apply(&event) {
                Ok(true) => {
                    if let Some(record) = document.record() {
                        if tx.send(record).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Ok(false) => {}
                Err(SourceError::Payload(e)) => {
                    debug!("Skipping malformed {} event: {}", event.event, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Err(SourceError::Closed)
}

impl DataSource for RealtimeSource {
    fn poll(&mut self) -> Option<HeartRateRecord> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        get_error(&self.last_error)
    }
}

impl Drop for RealtimeSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}
