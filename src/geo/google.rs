//! Resolver backed by the Google Geolocation API.
//!
//! The request carries only the `considerIp` flag, so the service locates
//! the caller's public IP. The device IP is logged for context but is not
//! sent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GeoError, GeolocationResolver, Location};

/// Default endpoint of the Google Geolocation API.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/geolocation/v1/geolocate";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeolocateRequest {
    consider_ip: bool,
}

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

/// Google Geolocation API client.
#[derive(Debug, Clone)]
pub struct GoogleGeolocator {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleGeolocator {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Override the endpoint (e.g. a proxy).
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Extract a usable location from a response body.
pub fn parse_geolocate_response(body: &[u8]) -> Result<Location, GeoError> {
    let response: GeolocateResponse =
        serde_json::from_slice(body).map_err(|e| GeoError::Parse(e.to_string()))?;

    let location = response
        .location
        .and_then(|l| Some(Location::new(l.lat?, l.lng?)))
        .ok_or(GeoError::MissingLocation)?;

    if location.is_valid() {
        Ok(location)
    } else {
        Err(GeoError::MissingLocation)
    }
}

#[async_trait]
impl GeolocationResolver for GoogleGeolocator {
    async fn resolve(&self, hint: &str) -> Result<Location, GeoError> {
        debug!("Resolving location for device {}", hint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&GeolocateRequest { consider_ip: true })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        parse_geolocate_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}
