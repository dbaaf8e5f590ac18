//! Application state and interaction logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::data::{AlertState, ChartPoint, Reading, SessionBuffer, Statistics, Threshold, ThresholdError};
use crate::geo::{LocationState, Locator};
use crate::map::{Basemap, MapLoader, Viewport, MAX_ZOOM};
use crate::source::{DataSource, HeartRateRecord};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// State of the threshold input field.
#[derive(Debug, Clone, Default)]
pub struct ThresholdInput {
    /// Text typed so far.
    pub text: String,
    /// Whether keystrokes currently go to the field.
    pub editing: bool,
    /// Validation error for `text`, if it does not parse.
    pub error: Option<ThresholdError>,
    /// Threshold in effect when editing began, restored on cancel.
    original: Threshold,
}

/// Main application state.
///
/// Owns the data source subscription: dropping the app drops the source,
/// which stops its background tasks.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub buffer: SessionBuffer,
    pub load_error: Option<String>,
    pub last_update: Option<Instant>,

    // Alerting
    pub threshold: Threshold,
    pub alert: Option<AlertState>,
    pub threshold_input: ThresholdInput,

    // Location and map
    locator: Locator,
    pub location: LocationState,
    map_loader: MapLoader,
    pub zoom: u8,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`.
    pub fn new(source: Box<dyn DataSource>, settings: &Settings, locator: Locator) -> Result<Self> {
        let threshold = settings.monitor.threshold()?;

        Ok(Self {
            running: true,
            show_help: false,
            source,
            buffer: SessionBuffer::with_capacity(settings.monitor.buffer_capacity),
            load_error: None,
            last_update: None,
            threshold,
            alert: None,
            threshold_input: ThresholdInput {
                original: threshold,
                ..Default::default()
            },
            locator,
            location: LocationState::default(),
            map_loader: MapLoader::from_config(settings.map.basemap.clone()),
            zoom: settings.map.zoom.min(MAX_ZOOM),
            theme: Theme::default(),
            status_message: None,
        })
    }

    /// Replace the basemap loader.
    pub fn with_map_loader(mut self, map_loader: MapLoader) -> Self {
        self.map_loader = map_loader;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Drain everything the source and the locator have ready.
    ///
    /// Returns whether any state changed.
    pub fn poll_source(&mut self) -> bool {
        let mut changed = false;

        while let Some(record) = self.source.poll() {
            changed |= self.handle_record(record);
        }

        while let Some(update) = self.locator.poll() {
            changed |= self.location.apply(update);
        }

        let error = self.source.error();
        if error != self.load_error {
            if let Some(ref err) = error {
                warn!("Data source error: {}", err);
            }
            self.load_error = error;
            changed = true;
        }

        changed
    }

    /// Process one record from the data source.
    ///
    /// Records without a usable heart rate and timestamp are dropped.
    /// Returns whether the record was accepted.
    pub fn handle_record(&mut self, record: HeartRateRecord) -> bool {
        let Some(reading) = Reading::from_record(&record) else {
            debug!("Ignoring incomplete record: {:?}", record);
            return false;
        };

        let alert = AlertState::evaluate(reading.value, self.threshold);
        if alert.exceeded {
            info!(
                "Heart rate {} bpm exceeds threshold {} bpm",
                alert.value, alert.threshold
            );
        }
        self.alert = Some(alert);

        if let Some(ip) = reading.source_ip.as_deref() {
            let seq = self.locator.request(ip);
            self.location.begin();
            debug!("Dispatched geolocation request {} for {}", seq, ip);
        }

        self.buffer.push(reading);
        self.last_update = Some(Instant::now());
        true
    }

    /// Aggregate statistics over the whole session.
    pub fn statistics(&self) -> Statistics {
        Statistics::from_buffer(&self.buffer)
    }

    /// Points for the chart pane.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.buffer.chart_points()
    }

    /// Whether the most recent reading exceeded the threshold.
    pub fn is_alerting(&self) -> bool {
        self.alert.is_some_and(|alert| alert.exceeded)
    }

    /// Start typing a new threshold.
    pub fn start_threshold_edit(&mut self) {
        self.threshold_input = ThresholdInput {
            text: self.threshold.to_string(),
            editing: true,
            error: None,
            original: self.threshold,
        };
    }

    /// Append a character to the threshold input.
    ///
    /// Only digits and a decimal point are accepted.
    pub fn threshold_push(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' {
            self.threshold_input.text.push(c);
            self.apply_threshold_text();
        }
    }

    /// Remove the last character from the threshold input.
    pub fn threshold_pop(&mut self) {
        self.threshold_input.text.pop();
        self.apply_threshold_text();
    }

    /// Apply the input text if it parses; otherwise keep the current threshold.
    fn apply_threshold_text(&mut self) {
        match Threshold::parse(&self.threshold_input.text) {
            Ok(threshold) => {
                self.threshold = threshold;
                self.threshold_input.error = None;
            }
            Err(e) => self.threshold_input.error = Some(e),
        }
    }

    /// Leave edit mode, keeping the last valid threshold.
    pub fn commit_threshold_edit(&mut self) {
        let input = &mut self.threshold_input;
        input.editing = false;

        if input.error.take().is_some() {
            input.text = self.threshold.to_string();
            self.set_status_message(format!("Threshold kept at {} bpm", self.threshold));
        } else if self.threshold != input.original {
            info!("Threshold changed from {} to {} bpm", input.original, self.threshold);
            self.set_status_message(format!("Threshold set to {} bpm", self.threshold));
        }
    }

    /// Leave edit mode and restore the threshold active before editing.
    pub fn cancel_threshold_edit(&mut self) {
        self.threshold = self.threshold_input.original;
        self.threshold_input.editing = false;
        self.threshold_input.error = None;
        self.threshold_input.text = self.threshold.to_string();
    }

    /// Zoom the map in one level.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    /// Zoom the map out one level.
    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
    }

    /// Viewport for the map pane, if a location is known.
    pub fn viewport(&self) -> Option<Viewport> {
        self.location.location.map(|location| Viewport::around(location, self.zoom))
    }

    /// Mount the map pane, loading the basemap on first use.
    pub fn mount_map(&self) -> Option<Arc<Basemap>> {
        self.map_loader.mount()
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the session to a JSON file.
    pub fn export_session(&self, path: &Path) -> Result<()> {
        if self.buffer.is_empty() {
            anyhow::bail!("No data to export");
        }

        let readings: Vec<&Reading> = self.buffer.iter().collect();
        let export = serde_json::json!({
            "source": self.source_description(),
            "threshold": self.threshold,
            "alert": self.alert,
            "statistics": self.statistics(),
            "location": self.location,
            "readings": readings,
        });

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)?;
        info!("Exported {} readings to {}", readings.len(), path.display());

        Ok(())
    }
}
