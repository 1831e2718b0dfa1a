//! Plugin output.
//!
//! A check run ends in a [`Report`]: the service state, a human readable
//! message and optionally performance data. Rendering follows the Nagios
//! plugin convention `[STATE] message | perfdata`.

use std::fmt;

use crate::errors::{format_error_for_display, PluginError};
use crate::results::MeasurementRecord;
use crate::state::ServiceState;
use crate::thresholds::ThresholdSet;

/// The unit speeds are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    /// 1000 bytes per kilobyte
    Decimal,
    /// 1024 bytes per kilobyte
    Binary,
}

impl SpeedUnit {
    /// Determine the unit from the `--mebibytes` flag.
    pub fn detect(mebibytes_flag: bool) -> Self {
        if mebibytes_flag {
            SpeedUnit::Binary
        } else {
            SpeedUnit::Decimal
        }
    }

    /// Rate suffix for the human readable message.
    pub fn rate(&self) -> &'static str {
        match self {
            SpeedUnit::Decimal => "Mbps",
            SpeedUnit::Binary => "Mibps",
        }
    }

    /// Unit of measurement for performance data.
    pub fn uom(&self) -> &'static str {
        match self {
            SpeedUnit::Decimal => "MB",
            SpeedUnit::Binary => "MiB",
        }
    }
}

/// The final result of a check run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub state: ServiceState,
    pub message: String,
    pub perf_data: Option<String>,
}

impl Report {
    pub fn new(state: ServiceState, message: impl Into<String>) -> Self {
        Self { state, message: message.into(), perf_data: None }
    }

    /// Attach performance data.
    pub fn with_perf_data(mut self, perf_data: impl Into<String>) -> Self {
        self.perf_data = Some(perf_data.into());
        self
    }

    /// Report a failed run.
    pub fn from_error(error: &PluginError) -> Self {
        Self::new(error.state(), format_error_for_display(error))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.state, self.message)?;

        if let Some(ref perf_data) = self.perf_data {
            write!(f, " | {}", perf_data)?;
        }

        Ok(())
    }
}

/// What a run prints before the process exits.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A check result, exits with the state's code
    Report(Report),
    /// The server listing, exits successfully
    Listing(String),
}

impl Output {
    pub fn exit_code(&self) -> u8 {
        match self {
            Output::Report(report) => report.state.exit_code(),
            Output::Listing(_) => 0,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Report(report) => fmt::Display::fmt(report, f),
            Output::Listing(listing) => f.write_str(listing.trim_end()),
        }
    }
}

/// Describe a measurement for the plugin message.
pub fn summary(measurement: &MeasurementRecord, unit: SpeedUnit) -> String {
    format!(
        "Speedtest to server '{}' at {} from client ip '{}':\n\
         Ping: {}ms\n\
         Jitter: {:.2}ms\n\
         Download: {:.2}{}\n\
         Upload: {:.2}{}",
        measurement.server.name,
        measurement.timestamp,
        measurement.client.ip,
        measurement.ping as i64,
        measurement.jitter,
        measurement.download,
        unit.rate(),
        measurement.upload,
        unit.rate(),
    )
}

/// Build performance data for the four checked dimensions and the byte
/// counters.
pub fn performance_data(
    measurement: &MeasurementRecord,
    warning: &ThresholdSet,
    critical: &ThresholdSet,
    unit: SpeedUnit,
) -> String {
    let uom = unit.uom();

    [
        format!(
            "'download'={:.2}{uom};{}{uom};{}{uom};;",
            measurement.download, warning.download, critical.download
        ),
        format!(
            "'upload'={:.2}{uom};{}{uom};{}{uom};;",
            measurement.upload, warning.upload, critical.upload
        ),
        format!(
            "'ping'={}ms;{}ms;{}ms;;",
            measurement.ping as i64, warning.ping, critical.ping
        ),
        format!(
            "'jitter'={:.2}ms;{}ms;{}ms;;",
            measurement.jitter, warning.jitter, critical.jitter
        ),
        format!("'bytes_sent'={}", measurement.bytes_sent),
        format!("'bytes_received'={}", measurement.bytes_received),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::fixtures::record;

    #[test]
    fn test_speed_unit_detect() {
        assert_eq!(SpeedUnit::detect(false), SpeedUnit::Decimal);
        assert_eq!(SpeedUnit::detect(true), SpeedUnit::Binary);
        assert_eq!(SpeedUnit::Decimal.uom(), "MB");
        assert_eq!(SpeedUnit::Binary.uom(), "MiB");
    }

    #[test]
    fn test_report_without_perf_data() {
        let report = Report::new(ServiceState::Warning, "slow");
        assert_eq!(report.to_string(), "[WARNING] slow");
    }

    #[test]
    fn test_report_with_perf_data() {
        let report = Report::new(ServiceState::Ok, "fine")
            .with_perf_data("'bytes_sent'=1");
        assert_eq!(report.to_string(), "[OK] fine | 'bytes_sent'=1");
    }

    #[test]
    fn test_report_from_config_error() {
        let error = PluginError::config(
            "Download warning threshold must be zero or higher than the \
             critical threshold!\n\
             Ping warning threshold must be zero or lower than the \
             critical threshold!",
        );
        let report = Report::from_error(&error);

        assert_eq!(report.state, ServiceState::Unknown);
        assert!(report.perf_data.is_none());
        let rendered = report.to_string();
        assert!(rendered.starts_with("[UNKNOWN] Download warning"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_summary() {
        let m = record(94.1712, 38.4, 12.9, 1.734);
        assert_eq!(
            summary(&m, SpeedUnit::Decimal),
            "Speedtest to server 'Frankfurt, Germany' at \
             2024-03-01T12:00:00.000000000+01:00 from client ip \
             '203.0.113.7':\n\
             Ping: 12ms\n\
             Jitter: 1.73ms\n\
             Download: 94.17Mbps\n\
             Upload: 38.40Mbps"
        );
    }

    #[test]
    fn test_summary_in_mebibits() {
        let m = record(10.0, 5.0, 20.0, 1.0);
        let text = summary(&m, SpeedUnit::Binary);
        assert!(text.contains("Download: 10.00Mibps"));
        assert!(text.contains("Upload: 5.00Mibps"));
    }

    #[test]
    fn test_performance_data() {
        let m = record(60.0, 25.5, 50.7, 5.0);
        let warning = ThresholdSet::new(50, 20, 75, 0);
        let critical = ThresholdSet::new(25, 10, 100, 0);

        assert_eq!(
            performance_data(&m, &warning, &critical, SpeedUnit::Decimal),
            "'download'=60.00MB;50MB;25MB;; \
             'upload'=25.50MB;20MB;10MB;; \
             'ping'=50ms;75ms;100ms;; \
             'jitter'=5.00ms;0ms;0ms;; \
             'bytes_sent'=31457280 \
             'bytes_received'=78643200"
        );
    }

    #[test]
    fn test_performance_data_in_mebibytes() {
        let m = record(60.0, 25.0, 50.0, 5.0);
        let set = ThresholdSet::new(50, 20, 75, 0);
        let perf = performance_data(&m, &set, &set, SpeedUnit::Binary);

        assert!(perf.starts_with("'download'=60.00MiB;50MiB;50MiB;;"));
        assert!(perf.contains("'upload'=25.00MiB;20MiB;20MiB;;"));
    }

    #[test]
    fn test_output_exit_codes() {
        let critical = Output::Report(Report::new(ServiceState::Critical, ""));
        assert_eq!(critical.exit_code(), 2);

        let listing = Output::Listing("[1] Frankfurt\n".to_string());
        assert_eq!(listing.exit_code(), 0);
        assert_eq!(listing.to_string(), "[1] Frankfurt");
    }
}
