//! Result data structures for librespeed-cli output.
//!
//! `librespeed-cli --json` prints one result object, or a list of them in
//! newer releases. Only the fields the check reports on are modelled;
//! anything else in the document is ignored.

use serde::Deserialize;

use crate::errors::PluginError;

/// A single speed test result.
///
/// Speeds are in Mbit/s (Mibit/s when `--mebibytes` is passed to the
/// speed test), ping and jitter in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeasurementRecord {
    /// When the test was run, as reported by librespeed-cli
    pub timestamp: String,
    /// Server the test was run against
    pub server: ServerInfo,
    /// The client as seen by the server
    pub client: ClientInfo,
    /// Bytes uploaded during the test
    pub bytes_sent: u64,
    /// Bytes downloaded during the test
    pub bytes_received: u64,
    /// Round-trip latency in milliseconds
    pub ping: f64,
    /// Latency variation in milliseconds
    pub jitter: f64,
    /// Upload speed
    pub upload: f64,
    /// Download speed
    pub download: f64,
}

impl MeasurementRecord {
    /// Reject records with values no real measurement can produce.
    pub fn check(self) -> Result<Self, PluginError> {
        let fields = [
            ("ping", self.ping),
            ("jitter", self.jitter),
            ("download", self.download),
            ("upload", self.upload),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PluginError::parse(format!(
                    "speed test reported an invalid {} of {}",
                    name, value
                )));
            }
        }

        Ok(self)
    }
}

/// Server information.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerInfo {
    pub name: String,
}

/// Client information.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientInfo {
    pub ip: String,
}

/// The document printed by `librespeed-cli --json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MeasurementResponse {
    Single(MeasurementRecord),
    Many(Vec<MeasurementRecord>),
}

impl MeasurementResponse {
    /// Take the first result out of the document.
    pub fn into_record(self) -> Result<MeasurementRecord, PluginError> {
        let record = match self {
            MeasurementResponse::Single(record) => record,
            MeasurementResponse::Many(records) => {
                records.into_iter().next().ok_or_else(|| {
                    PluginError::parse("speed test returned no results")
                })?
            }
        };

        record.check()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const OBJECT: &str = r#"{
        "timestamp": "2024-03-01T12:00:00.000000000+01:00",
        "server": {"name": "Frankfurt, Germany", "url": "https://fra.example/"},
        "client": {"ip": "203.0.113.7", "hostname": "", "org": "Example ISP"},
        "bytes_sent": 31457280,
        "bytes_received": 78643200,
        "ping": 12.5,
        "jitter": 1.73,
        "upload": 38.42,
        "download": 94.17,
        "share": ""
    }"#;

    #[test]
    fn test_parse_single_object() {
        let response: MeasurementResponse =
            serde_json::from_str(OBJECT).unwrap();
        let record = response.into_record().unwrap();

        assert_eq!(record.server.name, "Frankfurt, Germany");
        assert_eq!(record.client.ip, "203.0.113.7");
        assert_eq!(record.bytes_sent, 31_457_280);
        assert_eq!(record.bytes_received, 78_643_200);
        assert!((record.ping - 12.5).abs() < 0.001);
        assert!((record.jitter - 1.73).abs() < 0.001);
        assert!((record.upload - 38.42).abs() < 0.001);
        assert!((record.download - 94.17).abs() < 0.001);
    }

    #[test]
    fn test_parse_array_takes_first_result() {
        let json = format!("[{}]", OBJECT);
        let response: MeasurementResponse =
            serde_json::from_str(&json).unwrap();
        let record = response.into_record().unwrap();

        assert_eq!(record.server.name, "Frankfurt, Germany");
    }

    #[test]
    fn test_empty_array_is_an_error() {
        let response: MeasurementResponse =
            serde_json::from_str("[]").unwrap();
        let error = response.into_record().unwrap_err();

        assert_eq!(error.kind, ErrorKind::Parse);
        assert!(error.message.contains("no results"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = OBJECT.replace("\"jitter\": 1.73,", "");
        assert!(serde_json::from_str::<MeasurementResponse>(&json).is_err());
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let error = fixtures::record(-1.0, 10.0, 5.0, 1.0).check().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Parse);
        assert!(error.message.contains("download"));
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        assert!(fixtures::record(10.0, 10.0, f64::NAN, 1.0).check().is_err());
        assert!(fixtures::record(10.0, f64::INFINITY, 5.0, 1.0)
            .check()
            .is_err());
    }

    #[test]
    fn test_zero_values_are_accepted() {
        assert!(fixtures::record(0.0, 0.0, 0.0, 0.0).check().is_ok());
    }
}
