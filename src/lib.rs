//! # pulsewatch
//!
//! A terminal heart-rate monitor and library.
//!
//! pulsewatch subscribes to a realtime database path that a measuring
//! device keeps updated, plots the latest readings, keeps running
//! statistics for the session, places the device on a map and raises an
//! alert whenever a reading exceeds a user-set threshold.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(readings)│    │ (panes) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ├──▶ source  ◀── RealtimeSource | StreamSource | ...  │
//! │       ├──▶ geo     ◀── GoogleGeolocator | StaticResolver    │
//! │       └──▶ map     ◀── basemap loaded once                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state: session buffer, threshold, alert and location
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with implementations
//!   for the realtime database, TCP streams, channels and file polling
//! - **[`data`]**: Validated readings, the rolling session buffer, statistics and
//!   threshold evaluation
//! - **[`geo`]**: Background geolocation with a fixed fallback coordinate
//! - **[`map`]**: Basemap loading and viewport math for the map pane
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings (file, environment, flags)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Subscribe to a realtime database
//! pulsewatch --url https://example-default-rtdb.firebaseio.com
//!
//! # Read newline-delimited records from TCP
//! pulsewatch --connect localhost:9090
//!
//! # Poll a JSON file
//! pulsewatch --file heart_rate.json --threshold 120
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pulsewatch::config::Settings;
//! use pulsewatch::geo::{Location, Locator, StaticResolver};
//! use pulsewatch::{App, ChannelSource, HeartRateRecord};
//!
//! # tokio_test::block_on(async {
//! let (tx, source) = ChannelSource::create("device-bridge");
//! let locator = Locator::new(
//!     Arc::new(StaticResolver::new(Location::fallback())),
//!     tokio::runtime::Handle::current(),
//!     Location::fallback(),
//!     Duration::from_secs(5),
//! );
//! let mut app = App::new(Box::new(source), &Settings::default(), locator).unwrap();
//!
//! tx.send(Some(HeartRateRecord::new(172.0, 1_700_000_000_000))).unwrap();
//! app.poll_source();
//! assert!(app.is_alerting());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod geo;
pub mod map;
pub mod source;
pub mod ui;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use app::App;
pub use data::{AlertState, Reading, SessionBuffer, Statistics, Threshold, ThresholdError};
pub use geo::{GeoError, GeolocationResolver, Location, Locator};
pub use map::MapLoader;
pub use source::{
    ChannelSource, DataSource, FileSource, HeartRateRecord, RealtimeSource, SourceError,
    StreamSource,
};
