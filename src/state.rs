//! Monitoring service states.
//!
//! The four states understood by Nagios compatible monitoring systems and
//! the process exit codes they are signalled with.

use std::fmt;

/// The state a check run resolves to.
///
/// Variants are ordered from least to most severe so reports can be
/// sorted, but classification never compares states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    /// Every enabled dimension clears its warning bound
    Ok,
    /// At least one dimension sits inside its warning band
    Warning,
    /// At least one dimension is past its critical bound
    Critical,
    /// The check could not produce a verdict
    Unknown,
}

impl ServiceState {
    /// Get the exit code the monitoring system expects for this state.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }

    /// Get the upper-case label printed in front of the plugin output.
    pub const fn label(&self) -> &'static str {
        match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
