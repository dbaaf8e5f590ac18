//! Application settings.
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then environment variables, then command-line flags ([`Overrides`]).
//! [`Settings::validate`] runs once every layer has been applied.
//!
//! ```toml
//! [database]
//! url = "https://example-default-rtdb.firebaseio.com"
//! path = "heartRate"
//!
//! [geolocation]
//! api_key = "..."
//! timeout = "5s"
//!
//! [monitor]
//! threshold = 150
//! buffer_capacity = 3600
//!
//! [map]
//! zoom = 14
//! ```
//!
//! Environment variables use the `PULSEWATCH_` prefix with `__` between
//! nested keys, e.g. `PULSEWATCH_DATABASE__URL` or
//! `PULSEWATCH_GEOLOCATION__API_KEY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::buffer::DEFAULT_CAPACITY;
use crate::data::duration::parse_duration;
use crate::data::threshold::DEFAULT_THRESHOLD;
use crate::data::Threshold;
use crate::geo::{Location, FALLBACK_LATITUDE, FALLBACK_LONGITUDE};
use crate::map::DEFAULT_ZOOM;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PULSEWATCH";

/// All settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub geolocation: GeolocationSettings,
    pub monitor: MonitorSettings,
    pub map: MapSettings,
}

/// Realtime database connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Base URL of the database, e.g. `https://<project>-default-rtdb.firebaseio.com`.
    pub url: Option<String>,
    /// Path to subscribe to.
    pub path: String,
    /// Optional auth token passed as the `auth` query parameter.
    pub auth: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            path: "heartRate".to_string(),
            auth: None,
        }
    }
}

/// Geolocation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeolocationSettings {
    pub endpoint: String,
    /// Without a key every lookup resolves to the fallback location.
    pub api_key: Option<String>,
    pub timeout: String,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            endpoint: crate::geo::google::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: "5s".to_string(),
            fallback_latitude: FALLBACK_LATITUDE,
            fallback_longitude: FALLBACK_LONGITUDE,
        }
    }
}

impl GeolocationSettings {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout)
            .with_context(|| format!("invalid geolocation.timeout '{}'", self.timeout))
    }

    pub fn fallback(&self) -> Location {
        Location::new(self.fallback_latitude, self.fallback_longitude)
    }
}

/// Display controller behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Initial alert threshold in bpm.
    pub threshold: f64,
    /// Maximum readings kept in the session buffer.
    pub buffer_capacity: usize,
    /// How often the UI polls its source.
    pub refresh: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            buffer_capacity: DEFAULT_CAPACITY,
            refresh: "100ms".to_string(),
        }
    }
}

impl MonitorSettings {
    pub fn threshold(&self) -> Result<Threshold> {
        Threshold::new(self.threshold).context("invalid monitor.threshold")
    }

    pub fn refresh(&self) -> Result<Duration> {
        parse_duration(&self.refresh)
            .with_context(|| format!("invalid monitor.refresh '{}'", self.refresh))
    }
}

/// Map pane.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom: u8,
    /// GeoJSON coastline file; the bundled world map is used when unset.
    pub basemap: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            basemap: None,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub path: Option<String>,
    pub threshold: Option<f64>,
    pub refresh: Option<String>,
}

impl Settings {
    /// Load settings from `path` (or `pulsewatch.*` in the working directory
    /// when `None`) layered under `PULSEWATCH_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("pulsewatch").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to load configuration")?;

        config.try_deserialize().context("failed to parse configuration")
    }

    /// Apply command-line flags on top of file and environment settings.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.database.url = Some(url);
        }
        if let Some(path) = overrides.path {
            self.database.path = path;
        }
        if let Some(threshold) = overrides.threshold {
            self.monitor.threshold = threshold;
        }
        if let Some(refresh) = overrides.refresh {
            self.monitor.refresh = refresh;
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.monitor.threshold()?;
        self.monitor.refresh()?;
        self.geolocation.timeout()?;
        if !self.geolocation.fallback().is_valid() {
            anyhow::bail!("geolocation fallback coordinate is outside the globe");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.database.url.is_none());
        assert_eq!(settings.database.path, "heartRate");
        assert_eq!(settings.monitor.threshold().unwrap().bpm(), 150.0);
        assert_eq!(settings.monitor.buffer_capacity, 3600);
        assert_eq!(settings.monitor.refresh().unwrap(), Duration::from_millis(100));
        assert_eq!(settings.geolocation.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(settings.geolocation.fallback(), Location::new(43.642567, -79.387054));
        assert_eq!(settings.map.zoom, 14);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
            [database]
            url = "https://example-default-rtdb.firebaseio.com"
            path = "devices/watch/heartRate"

            [geolocation]
            api_key = "key-123"
            timeout = "2s"

            [monitor]
            threshold = 120
            buffer_capacity = 50

            [map]
            zoom = 6
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(
            settings.database.url.as_deref(),
            Some("https://example-default-rtdb.firebaseio.com")
        );
        assert_eq!(settings.database.path, "devices/watch/heartRate");
        assert_eq!(settings.geolocation.api_key.as_deref(), Some("key-123"));
        assert_eq!(settings.geolocation.timeout().unwrap(), Duration::from_secs(2));
        assert_eq!(settings.monitor.threshold().unwrap().bpm(), 120.0);
        assert_eq!(settings.monitor.buffer_capacity, 50);
        assert_eq!(settings.map.zoom, 6);
        // Unset keys keep their defaults
        assert_eq!(settings.monitor.refresh, "100ms");
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let file = toml_file("[monitor]\nthreshold = -4\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_flag_overrides_invalid_file_value() {
        let file = toml_file("[monitor]\nthreshold = 400\nrefresh = \"soon\"\n");
        let mut settings = Settings::load(Some(file.path())).unwrap();
        assert!(settings.validate().is_err());

        settings.apply_overrides(Overrides {
            threshold: Some(120.0),
            refresh: Some("250ms".to_string()),
            ..Default::default()
        });

        assert!(settings.validate().is_ok());
        assert_eq!(settings.monitor.threshold().unwrap().bpm(), 120.0);
        assert_eq!(settings.monitor.refresh().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let file = toml_file(
            "[database]\nurl = \"https://file.example\"\npath = \"fromFile\"\n[monitor]\nthreshold = 130\n",
        );
        let mut settings = Settings::load(Some(file.path())).unwrap();

        settings.apply_overrides(Overrides {
            path: Some("fromFlag".to_string()),
            ..Default::default()
        });

        assert_eq!(settings.database.url.as_deref(), Some("https://file.example"));
        assert_eq!(settings.database.path, "fromFlag");
        assert_eq!(settings.monitor.threshold, 130.0);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        assert!(Settings::load(Some(Path::new("/nonexistent/pulsewatch.toml"))).is_err());
    }
}
