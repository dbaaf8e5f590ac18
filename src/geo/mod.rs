//! Geolocation of the measuring device.
//!
//! Readings may carry the device's IP address. When they do, the
//! [`Locator`] asks a [`GeolocationResolver`] for an approximate position in
//! the background. Failures never reach the UI: they are replaced by a
//! fixed fallback coordinate.
//!
//! ```text
//! Reading.source_ip ──▶ Locator::request() ──▶ tokio task ──▶ resolver.resolve()
//!                                                   │
//!                                   Ok(location) / Err → fallback
//!                                                   ▼
//! LocationState::apply() ◀── Locator::poll() ◀── mpsc channel
//! ```

pub mod google;
mod locator;

pub use google::GoogleGeolocator;
pub use locator::{LocationState, LocationUpdate, Locator};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latitude used when a location cannot be resolved.
pub const FALLBACK_LATITUDE: f64 = 43.642567;
/// Longitude used when a location cannot be resolved.
pub const FALLBACK_LONGITUDE: f64 = -79.387054;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The fixed coordinate substituted for failed lookups.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_LATITUDE, FALLBACK_LONGITUDE)
    }

    /// Whether both coordinates are finite and within the globe.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Errors that can occur while resolving a location.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Geolocation service returned status {0}")]
    Status(u16),

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The response parsed but has no usable coordinate.
    #[error("Response has no usable location")]
    MissingLocation,

    /// Timeout waiting for the service.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeoError::Timeout
        } else if let Some(status) = err.status() {
            GeoError::Status(status.as_u16())
        } else if err.is_decode() {
            GeoError::Parse(err.to_string())
        } else {
            GeoError::Http(err.to_string())
        }
    }
}

/// Resolves an approximate location for a device.
#[async_trait]
pub trait GeolocationResolver: Send + Sync {
    /// Resolve a location; `hint` is the device IP reported with the reading.
    async fn resolve(&self, hint: &str) -> Result<Location, GeoError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// A resolver that always answers with the same location.
///
/// Used when no geolocation service is configured.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    location: Location,
}

impl StaticResolver {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl GeolocationResolver for StaticResolver {
    async fn resolve(&self, _hint: &str) -> Result<Location, GeoError> {
        Ok(self.location)
    }

    fn name(&self) -> &str {
        "static"
    }
}
