//! Service state classification.
//!
//! Turns a speed test result and the warning/critical thresholds into a
//! single [`ServiceState`]. Throughput dimensions degrade as the measured
//! value falls, latency dimensions as it rises.
//!
//! Three predicates are evaluated independently and applied in a fixed
//! order, each later one overwriting the state set by the earlier ones:
//!
//! 1. warning: any dimension lies strictly inside its warning band
//! 2. critical: any enabled dimension lies strictly past its critical bound
//! 3. ok: every dimension clears its warning bound
//!
//! The state starts as `Unknown` and stays there when none of them match.
//! Because the ok predicate runs last it overrides an earlier warning or
//! critical verdict whenever all four dimensions clear their warning
//! bounds.

use crate::results::MeasurementRecord;
use crate::state::ServiceState;
use crate::thresholds::{Dimension, Direction, ThresholdSet};

/// Which dimensions matched each predicate for one measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Dimensions inside their warning band
    pub warning: Vec<Dimension>,
    /// Dimensions past their critical bound
    pub critical: Vec<Dimension>,
    /// Dimensions that do not clear their warning bound
    pub not_ok: Vec<Dimension>,
}

impl Evaluation {
    /// Apply the predicates in order to get the final state.
    pub fn state(&self) -> ServiceState {
        let mut state = ServiceState::Unknown;

        if !self.warning.is_empty() {
            state = ServiceState::Warning;
        }

        if !self.critical.is_empty() {
            state = ServiceState::Critical;
        }

        if self.not_ok.is_empty() {
            state = ServiceState::Ok;
        }

        state
    }
}

/// Get the measured value for a dimension.
fn measured(measurement: &MeasurementRecord, dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Download => measurement.download,
        Dimension::Upload => measurement.upload,
        Dimension::Ping => measurement.ping,
        Dimension::Jitter => measurement.jitter,
    }
}

/// The value has degraded past the warning bound but not yet reached the
/// critical one.
fn in_warning_band(value: f64, direction: Direction, warn: f64, crit: f64) -> bool {
    match direction {
        Direction::HigherIsBetter => warn > 0.0 && crit < value && value < warn,
        Direction::LowerIsBetter => 0.0 < warn && warn < value && value < crit,
    }
}

/// The value has degraded past the critical bound.
fn past_critical(value: f64, direction: Direction, crit: f64) -> bool {
    match direction {
        Direction::HigherIsBetter => crit > 0.0 && value < crit,
        Direction::LowerIsBetter => 0.0 < crit && crit < value,
    }
}

/// The value clears the warning bound.
///
/// For throughput this is a plain `value > warn` without an enabled check,
/// so a disabled floor of zero still needs a non-zero measurement.
fn clears_warning(value: f64, direction: Direction, warn: f64) -> bool {
    match direction {
        Direction::HigherIsBetter => value > warn,
        Direction::LowerIsBetter => value < warn || warn <= 0.0,
    }
}

/// Evaluate every predicate for every dimension.
pub fn evaluate(
    measurement: &MeasurementRecord,
    warning: &ThresholdSet,
    critical: &ThresholdSet,
) -> Evaluation {
    let mut evaluation = Evaluation {
        warning: Vec::new(),
        critical: Vec::new(),
        not_ok: Vec::new(),
    };

    for dimension in Dimension::ALL {
        let value = measured(measurement, dimension);
        let direction = dimension.direction();
        let warn = warning.get(dimension) as f64;
        let crit = critical.get(dimension) as f64;

        if in_warning_band(value, direction, warn, crit) {
            evaluation.warning.push(dimension);
        }
        if past_critical(value, direction, crit) {
            evaluation.critical.push(dimension);
        }
        if !clears_warning(value, direction, warn) {
            evaluation.not_ok.push(dimension);
        }
    }

    evaluation
}

/// Classify a measurement against the warning and critical thresholds.
pub fn classify(
    measurement: &MeasurementRecord,
    warning: &ThresholdSet,
    critical: &ThresholdSet,
) -> ServiceState {
    evaluate(measurement, warning, critical).state()
}
