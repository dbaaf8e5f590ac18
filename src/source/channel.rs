//! Channel-based data source.
//!
//! Receives heart-rate records via a tokio watch channel. Like a realtime
//! database value listener, only the latest record matters: a producer that
//! sends faster than the UI polls overwrites records the UI has not seen.

use tokio::sync::watch;

use super::{DataSource, HeartRateRecord};

/// A data source that receives records via a channel.
///
/// # Example
///
/// ```
/// use pulsewatch::{ChannelSource, DataSource, HeartRateRecord};
///
/// let (tx, mut source) = ChannelSource::create("device-bridge");
/// tx.send(Some(HeartRateRecord::new(72.0, 1_700_000_000_000))).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<HeartRateRecord>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where records come from
    pub fn new(receiver: watch::Receiver<Option<HeartRateRecord>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending records to a ChannelSource.
    ///
    /// Returns (sender, source). The channel starts empty.
    pub fn create(source_description: &str) -> (watch::Sender<Option<HeartRateRecord>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<HeartRateRecord> {
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Producer disconnected".to_string())
        } else {
            None
        }
    }
}
