//! Wire format of a heart-rate record.
//!
//! This matches the value stored at the subscribed database path by the
//! measuring device:
//!
//! ```json
//! { "heartRate": 72, "timestamp": 1700000000000, "deviceIP": "203.0.113.7" }
//! ```

use serde::{Deserialize, Serialize};

/// A raw record as emitted by the data source.
///
/// Every field is optional on the wire; validation happens when the record
/// is turned into a [`Reading`](crate::data::Reading).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartRateRecord {
    /// Heart rate in beats per minute.
    #[serde(rename = "heartRate", default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    /// Observation time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// IP address of the measuring device.
    #[serde(rename = "deviceIP", default, skip_serializing_if = "Option::is_none")]
    pub device_ip: Option<String>,
}

impl HeartRateRecord {
    /// Convenience constructor for a complete record.
    pub fn new(heart_rate: f64, timestamp_ms: i64) -> Self {
        Self {
            heart_rate: Some(heart_rate),
            timestamp: Some(timestamp_ms as f64),
            device_ip: None,
        }
    }

    /// Attach a device IP.
    pub fn with_device_ip(mut self, ip: &str) -> Self {
        self.device_ip = Some(ip.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_record() {
        let json = r#"{"heartRate": 72, "timestamp": 1700000000000, "deviceIP": "203.0.113.7"}"#;
        let record: HeartRateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.heart_rate, Some(72.0));
        assert_eq!(record.timestamp, Some(1_700_000_000_000.0));
        assert_eq!(record.device_ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_deserialize_partial_record() {
        let record: HeartRateRecord = serde_json::from_str(r#"{"heartRate": 95.5}"#).unwrap();
        assert_eq!(record.heart_rate, Some(95.5));
        assert!(record.timestamp.is_none());
        assert!(record.device_ip.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let record: HeartRateRecord =
            serde_json::from_str(r#"{"heartRate": 60, "timestamp": 1, "battery": 80}"#).unwrap();
        assert_eq!(record.heart_rate, Some(60.0));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        assert!(serde_json::from_str::<HeartRateRecord>(r#"{"heartRate": "fast"}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let record = HeartRateRecord::new(80.0, 1_000).with_device_ip("10.0.0.1");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["heartRate"], 80.0);
        assert_eq!(value["deviceIP"], "10.0.0.1");
    }
}
