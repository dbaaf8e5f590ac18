//! Validated heart-rate readings.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::source::HeartRateRecord;

/// A single heart-rate reading accepted from the data source.
///
/// Readings are immutable once built. Only records carrying both a
/// usable `heartRate` and a usable `timestamp` become readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Heart rate in beats per minute.
    pub value: f64,
    /// When the device observed the value.
    pub observed_at: DateTime<Utc>,
    /// Device IP reported alongside the reading, used as a geolocation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
}

impl Reading {
    /// Build a reading from a wire record.
    ///
    /// Returns `None` when the heart rate is missing, zero or not finite, or
    /// when the timestamp is missing, zero or outside the representable range.
    pub fn from_record(record: &HeartRateRecord) -> Option<Self> {
        let value = record.heart_rate.filter(|v| v.is_finite() && *v != 0.0)?;
        let millis = record.timestamp.filter(|t| t.is_finite() && *t != 0.0)?;
        let observed_at = DateTime::<Utc>::from_timestamp_millis(millis as i64)?;

        let source_ip = record
            .device_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        Some(Self {
            value,
            observed_at,
            source_ip,
        })
    }

    /// Local wall-clock time of the reading, e.g. "14:05:09".
    pub fn time_label(&self) -> String {
        self.observed_at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(heart_rate: Option<f64>, timestamp: Option<f64>, ip: Option<&str>) -> HeartRateRecord {
        HeartRateRecord {
            heart_rate,
            timestamp,
            device_ip: ip.map(str::to_string),
        }
    }

    #[test]
    fn test_from_record_complete() {
        let reading =
            Reading::from_record(&record(Some(72.0), Some(1_700_000_000_000.0), Some("10.0.0.7")))
                .unwrap();
        assert_eq!(reading.value, 72.0);
        assert_eq!(reading.observed_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(reading.source_ip.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_from_record_missing_fields() {
        assert!(Reading::from_record(&record(None, Some(1_700_000_000_000.0), None)).is_none());
        assert!(Reading::from_record(&record(Some(80.0), None, None)).is_none());
        assert!(Reading::from_record(&record(None, None, Some("10.0.0.7"))).is_none());
    }

    #[test]
    fn test_from_record_zero_values_are_absent() {
        assert!(Reading::from_record(&record(Some(0.0), Some(1_700_000_000_000.0), None)).is_none());
        assert!(Reading::from_record(&record(Some(80.0), Some(0.0), None)).is_none());
    }

    #[test]
    fn test_from_record_rejects_non_finite() {
        assert!(
            Reading::from_record(&record(Some(f64::NAN), Some(1_700_000_000_000.0), None)).is_none()
        );
        assert!(Reading::from_record(&record(Some(80.0), Some(f64::INFINITY), None)).is_none());
    }

    #[test]
    fn test_blank_ip_is_dropped() {
        let reading =
            Reading::from_record(&record(Some(72.0), Some(1_700_000_000_000.0), Some("  ")))
                .unwrap();
        assert!(reading.source_ip.is_none());
    }

    #[test]
    fn test_time_label_format() {
        let reading =
            Reading::from_record(&record(Some(72.0), Some(1_700_000_000_000.0), None)).unwrap();
        let label = reading.time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
