//! Error categories and the structured error response

pub mod codes;
pub mod description;
pub mod kinds;
pub mod response;

pub use codes::{
    ErrorCategory, INTERNAL_ERROR_CODE, INTERNAL_ERROR_REASON, VALIDATION_ERROR_CODE,
    VALIDATION_ERROR_REASON,
};
pub use description::{parse_failure_description, FailureDescription};
pub use kinds::{
    Abort, AggregatedValidationError, AppError, CodedError, DebuggableError, ErrorSource,
    InternalError, RaisedError, ValidationResult, ValidationsError,
};
pub use response::{ErrorResponse, FieldFailure};
