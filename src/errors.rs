//! Error types for the check plugin.
//!
//! Every failure a check run can hit ends as an `UNKNOWN` result. The
//! error kinds only differ in how they are described to the operator.

use std::error::Error;
use std::fmt;

use crate::state::ServiceState;

/// Categories of errors that can occur during a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid command line arguments.
    Usage,
    /// Malformed or inconsistent thresholds.
    Config,
    /// The speed test executable could not be run or failed.
    Execution,
    /// The speed test output could not be understood.
    Parse,
    /// The speed test did not finish in time.
    Timeout,
}

impl ErrorKind {
    /// Get the service state reported for this error kind.
    pub fn state(&self) -> ServiceState {
        ServiceState::Unknown
    }

    /// Get a user-friendly description of this error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Usage => "Usage error",
            ErrorKind::Config => "Configuration error",
            ErrorKind::Execution => "Speed test error",
            ErrorKind::Parse => "Speed test output error",
            ErrorKind::Timeout => "Speed test timeout",
        }
    }
}

/// A user-friendly error type for check runs.
#[derive(Debug)]
pub struct PluginError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// User-friendly error message.
    pub message: String,
    /// Optional suggestion for how to resolve the error.
    pub suggestion: Option<String>,
    /// The underlying error, if any.
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl PluginError {
    /// Create a new PluginError.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), suggestion: None, source: None }
    }

    /// Add a suggestion for how to resolve the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add the underlying error source.
    pub fn with_source(
        mut self,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the service state reported for this error.
    pub fn state(&self) -> ServiceState {
        self.kind.state()
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
            .with_suggestion("Run with --help to see the accepted arguments.")
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Create an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, message)
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message).with_suggestion(
            "The speed test server may be slow or unreachable. Raise \
             --timeout or pick another server with --server.",
        )
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.description(), self.message)?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl Error for PluginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<std::io::Error> for PluginError {
    fn from(error: std::io::Error) -> Self {
        PluginError::execution(format!("failed to run speed test: {}", error))
            .with_source(error)
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(error: serde_json::Error) -> Self {
        PluginError::parse(format!("invalid speed test result: {}", error))
            .with_source(error)
    }
}

/// Format an error as the message part of an `UNKNOWN` plugin output.
///
/// Configuration errors are printed as-is since they already read as
/// instructions to the operator. Everything else gets its description
/// prefixed so the monitoring UI tells the failure modes apart.
pub fn format_error_for_display(error: &PluginError) -> String {
    let mut output = match error.kind {
        ErrorKind::Config => error.message.clone(),
        _ => format!("{}: {}", error.kind.description(), error.message),
    };

    if let Some(ref suggestion) = error.suggestion {
        output.push_str(&format!("\n{}", suggestion));
    }

    output
}
