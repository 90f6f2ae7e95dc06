use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::kinds::CodedError;

/// Structured error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable reason
    pub reason: String,
    /// Substitution values for the reason
    pub values: Vec<String>,
    /// Field-level failures, present only for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FieldFailure>>,
}

/// One field-level validation failure.
///
/// `code` and `values` are empty rather than missing when the source
/// provides nothing for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldFailure {
    /// Key of the validated field
    pub field: String,
    /// Machine code, empty if unavailable
    pub code: String,
    /// Human message
    pub reason: String,
    /// Values referenced in the message, e.g. numeric bounds
    pub values: Vec<String>,
}

impl FieldFailure {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        reason: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            reason: reason.into(),
            values,
        }
    }

    /// Build a failure for `field` from an application error's code, reason and values
    pub fn from_coded(field: impl Into<String>, error: &dyn CodedError) -> Self {
        Self {
            field: field.into(),
            code: error.code(),
            reason: error.reason(),
            values: error.values(),
        }
    }
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
            values: Vec::new(),
            failures: None,
        }
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn with_failures(mut self, failures: Vec<FieldFailure>) -> Self {
        self.failures = Some(failures);
        self
    }
}
