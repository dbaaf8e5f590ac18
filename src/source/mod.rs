//! Data source abstraction for receiving heart-rate records.
//!
//! This module provides a trait-based abstraction for receiving records from
//! various sources (a realtime database subscription, network streams,
//! in-process channels, or a polled file).

mod channel;
mod file;
mod realtime;
mod record;
mod sse;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use realtime::{RealtimeDocument, RealtimeSource, SourceError};
pub use record::HeartRateRecord;
pub use sse::{SseDecoder, SseEvent};
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving heart-rate records from various sources.
///
/// Dropping a source releases its subscription: background tasks owned by
/// the source are stopped.
///
/// # Example
///
/// ```
/// use pulsewatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("heart_rate.json");
/// while let Some(record) = source.poll() {
///     println!("heart rate: {:?}", record.heart_rate);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next record.
    ///
    /// Returns `Some(record)` if a new record is available, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<HeartRateRecord>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Returns the most recent error reported by the source, if any.
    fn error(&self) -> Option<String>;
}
