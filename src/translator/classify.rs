use axum::http::{HeaderMap, StatusCode};

use super::{ClassifiedError, Environment};
use crate::errors::{
    parse_failure_description, Abort, AppError, CodedError, DebuggableError, ErrorCategory,
    FieldFailure, ValidationResult, INTERNAL_ERROR_CODE, INTERNAL_ERROR_REASON,
    VALIDATION_ERROR_CODE, VALIDATION_ERROR_REASON,
};

/// Determine code, reason, status, headers and failures for a raised error.
///
/// Never fails: anything without a more specific shape is reported as an
/// internal application error. In release mode internal detail is replaced
/// by a generic code and reason.
pub fn classify(error: &AppError, environment: Environment) -> ClassifiedError {
    match error {
        AppError::Coded(coded) => from_coded(coded.as_ref()),
        AppError::AggregatedValidation(validation) => {
            validation_error(ErrorCategory::AggregatedValidation, validation.failures.clone())
        }
        AppError::FrameworkValidation(validation) => validation_error(
            ErrorCategory::FrameworkValidation,
            validation.failures.iter().map(field_failure).collect(),
        ),
        AppError::Abort(abort) => from_abort(abort),
        AppError::Debuggable(debuggable) => from_debuggable(debuggable.as_ref(), environment),
        AppError::Unclassified(other) => {
            let reason = if environment.is_release() {
                INTERNAL_ERROR_REASON.to_string()
            } else {
                format!("{other:#}")
            };
            internal_error(ErrorCategory::Unclassified, INTERNAL_ERROR_CODE.to_string(), reason)
        }
    }
}

fn from_coded(error: &dyn CodedError) -> ClassifiedError {
    ClassifiedError {
        category: ErrorCategory::Coded,
        code: error.code(),
        reason: error.reason(),
        status: error.status(),
        headers: error.headers(),
        values: error.values(),
        failures: None,
    }
}

fn validation_error(category: ErrorCategory, failures: Vec<FieldFailure>) -> ClassifiedError {
    ClassifiedError {
        category,
        code: VALIDATION_ERROR_CODE.to_string(),
        reason: VALIDATION_ERROR_REASON.to_string(),
        status: StatusCode::BAD_REQUEST,
        headers: HeaderMap::new(),
        values: Vec::new(),
        failures: Some(failures),
    }
}

/// Build a field failure from a raw validation result.
///
/// A custom description is parsed as `code:reason[:values]`; otherwise the
/// generic description becomes the reason with an empty code.
fn field_failure(result: &ValidationResult) -> FieldFailure {
    match result.custom_failure_description.as_deref() {
        Some(description) => {
            let parsed = parse_failure_description(description);
            FieldFailure::new(&result.key, parsed.code, parsed.reason, parsed.values)
        }
        None => FieldFailure::new(
            &result.key,
            "",
            result.failure_description.clone().unwrap_or_default(),
            Vec::new(),
        ),
    }
}

// The reason doubles as the code: aborts carry no machine code of their own.
fn from_abort(abort: &Abort) -> ClassifiedError {
    ClassifiedError {
        category: ErrorCategory::Abort,
        code: abort.reason.clone(),
        reason: abort.reason.clone(),
        status: abort.status,
        headers: abort.headers.clone(),
        values: Vec::new(),
        failures: None,
    }
}

fn from_debuggable(error: &dyn DebuggableError, environment: Environment) -> ClassifiedError {
    let (code, reason) = if environment.is_release() {
        (
            INTERNAL_ERROR_CODE.to_string(),
            INTERNAL_ERROR_REASON.to_string(),
        )
    } else {
        (error.identifier(), error.reason())
    };

    internal_error(ErrorCategory::Debuggable, code, reason)
}

fn internal_error(category: ErrorCategory, code: String, reason: String) -> ClassifiedError {
    ClassifiedError {
        category,
        code,
        reason,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        headers: HeaderMap::new(),
        values: Vec::new(),
        failures: None,
    }
}
