//! Warning and critical thresholds.
//!
//! Thresholds are given on the command line as
//! `<download>;<upload>;<ping>;<jitter>`. A value of zero or less disables
//! the check for that dimension.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::errors::PluginError;

/// Default warning thresholds.
pub const DEFAULT_WARNING: &str = "50;20;75;0";

/// Default critical thresholds.
pub const DEFAULT_CRITICAL: &str = "25;10;100;0";

/// Whether a larger measured value is good or bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Throughput: the check degrades as the value falls below a floor
    HigherIsBetter,
    /// Latency: the check degrades as the value rises above a ceiling
    LowerIsBetter,
}

/// One of the four measured quantities a check is run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Download,
    Upload,
    Ping,
    Jitter,
}

impl Dimension {
    /// All dimensions in threshold string order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Download,
        Dimension::Upload,
        Dimension::Ping,
        Dimension::Jitter,
    ];

    pub const fn direction(&self) -> Direction {
        match self {
            Dimension::Download | Dimension::Upload => {
                Direction::HigherIsBetter
            }
            Dimension::Ping | Dimension::Jitter => Direction::LowerIsBetter,
        }
    }

    /// Capitalized name used in operator facing messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Dimension::Download => "Download",
            Dimension::Upload => "Upload",
            Dimension::Ping => "Ping",
            Dimension::Jitter => "Jitter",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of per-dimension thresholds, either all warning or all critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSet {
    /// Download floor in Mbit/s
    pub download: i64,
    /// Upload floor in Mbit/s
    pub upload: i64,
    /// Ping ceiling in milliseconds
    pub ping: i64,
    /// Jitter ceiling in milliseconds
    pub jitter: i64,
}

impl ThresholdSet {
    pub const fn new(download: i64, upload: i64, ping: i64, jitter: i64) -> Self {
        Self { download, upload, ping, jitter }
    }

    /// Get the threshold configured for a dimension.
    pub const fn get(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Download => self.download,
            Dimension::Upload => self.upload,
            Dimension::Ping => self.ping,
            Dimension::Jitter => self.jitter,
        }
    }

    /// Returns true if the check for this dimension is switched on.
    pub const fn is_enabled(&self, dimension: Dimension) -> bool {
        self.get(dimension) > 0
    }
}

impl FromStr for ThresholdSet {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(';').collect();

        if fields.len() != Dimension::ALL.len() {
            return Err(PluginError::config(format!(
                "Threshold '{}' must have exactly 4 fields in the form \
                 <download>;<upload>;<ping>;<jitter>, got {}",
                s,
                fields.len()
            )));
        }

        let mut values = [0i64; 4];
        for ((value, field), dimension) in
            values.iter_mut().zip(&fields).zip(Dimension::ALL)
        {
            *value = field.trim().parse().map_err(|e| {
                PluginError::config(format!(
                    "{} threshold '{}' in '{}' is not an integer",
                    dimension,
                    field.trim(),
                    s
                ))
                .with_source(e)
            })?;
        }

        let [download, upload, ping, jitter] = values;
        Ok(Self { download, upload, ping, jitter })
    }
}

impl fmt::Display for ThresholdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{};{}",
            self.download, self.upload, self.ping, self.jitter
        )
    }
}

/// A dimension whose warning and critical thresholds are in the wrong
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdViolation {
    pub dimension: Dimension,
    pub warning: i64,
    pub critical: i64,
}

impl fmt::Display for ThresholdViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = match self.dimension.direction() {
            Direction::HigherIsBetter => "higher",
            Direction::LowerIsBetter => "lower",
        };
        write!(
            f,
            "{} warning threshold must be zero or {} than the critical \
             threshold!",
            self.dimension, relation
        )
    }
}

/// Check that each warning threshold triggers before its critical one.
///
/// All four dimensions are checked and every offending one is returned.
/// A pair is only compared when both of its thresholds are enabled.
pub fn validate(
    warning: &ThresholdSet,
    critical: &ThresholdSet,
) -> Result<(), Vec<ThresholdViolation>> {
    let violations: Vec<ThresholdViolation> = Dimension::ALL
        .into_iter()
        .filter(|&dimension| {
            let (warn, crit) = (warning.get(dimension), critical.get(dimension));
            let misordered = match dimension.direction() {
                Direction::HigherIsBetter => warn < crit,
                Direction::LowerIsBetter => warn > crit,
            };
            misordered
                && critical.is_enabled(dimension)
                && warning.is_enabled(dimension)
        })
        .map(|dimension| ThresholdViolation {
            dimension,
            warning: warning.get(dimension),
            critical: critical.get(dimension),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Parse both threshold strings and validate them against each other.
///
/// Parse failures and ordering violations are all reported as a single
/// configuration error listing one problem per line.
pub fn parse_and_validate(
    warning: &str,
    critical: &str,
) -> Result<(ThresholdSet, ThresholdSet), PluginError> {
    let warning: ThresholdSet = warning.parse()?;
    let critical: ThresholdSet = critical.parse()?;

    debug!("Warning thresholds: {}, critical thresholds: {}", warning, critical);

    validate(&warning, &critical).map_err(|violations| {
        for violation in &violations {
            debug!(
                "{} thresholds out of order: warning {}, critical {}",
                violation.dimension, violation.warning, violation.critical
            );
        }
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        PluginError::config(message)
    })?;

    Ok((warning, critical))
}
