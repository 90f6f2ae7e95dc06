use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level code for every validation failure response
pub const VALIDATION_ERROR_CODE: &str = "ValidationError";

/// Top-level reason for every validation failure response
pub const VALIDATION_ERROR_REASON: &str = "Validation errors occurs.";

/// Code reported for internal failures whose detail is not disclosed
pub const INTERNAL_ERROR_CODE: &str = "internalApplicationError";

/// Reason reported in release mode for internal failures
pub const INTERNAL_ERROR_REASON: &str = "The operation failed due to a server error.";

/// The closed set of error shapes the translator recognises, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Application error carrying its own code, reason and status
    Coded,

    /// Pre-built list of field failures
    AggregatedValidation,

    /// Raw per-field results that still need description parsing
    FrameworkValidation,

    /// Framework-level abort with only a reason and status
    Abort,

    /// Internal error with a redactable identifier
    Debuggable,

    /// Anything else
    Unclassified,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCategory {
    /// Stable label used in log records and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coded => "coded",
            Self::AggregatedValidation => "aggregated_validation",
            Self::FrameworkValidation => "framework_validation",
            Self::Abort => "abort",
            Self::Debuggable => "debuggable",
            Self::Unclassified => "unclassified",
        }
    }

    /// Whether the response body may contain internal detail outside debug mode
    pub fn is_redactable(&self) -> bool {
        matches!(self, Self::Debuggable | Self::Unclassified)
    }
}
