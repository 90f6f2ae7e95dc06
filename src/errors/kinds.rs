use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::{fmt, panic::Location, sync::Arc};

use super::response::FieldFailure;
use crate::translator::{classify, render, Environment};

/// Application error that describes itself completely.
///
/// Implement this for domain error enums; wrap values with [`AppError::coded`].
pub trait CodedError: std::error::Error + Send + Sync + 'static {
    /// Machine-readable code
    fn code(&self) -> String;

    /// Human-readable reason
    fn reason(&self) -> String;

    /// HTTP status of the response
    fn status(&self) -> StatusCode;

    /// Extra response headers
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Substitution values for the reason
    fn values(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Internal error whose detail is only disclosed outside release mode
pub trait DebuggableError: std::error::Error + Send + Sync + 'static {
    /// Internal identifier, e.g. `database.connectionLost`
    fn identifier(&self) -> String;

    /// Detailed diagnostic message
    fn reason(&self) -> String;

    /// Where the error was raised, if known
    fn location(&self) -> Option<ErrorSource> {
        None
    }
}

/// Source location of a raised error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSource {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorSource {
    /// Location of the caller
    #[track_caller]
    pub fn capture() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// General-purpose [`DebuggableError`]
#[derive(Debug, Clone, thiserror::Error)]
#[error("{identifier}: {reason}")]
pub struct InternalError {
    pub identifier: String,
    pub reason: String,
    pub location: ErrorSource,
}

impl InternalError {
    #[track_caller]
    pub fn new(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            reason: reason.into(),
            location: ErrorSource::capture(),
        }
    }
}

impl DebuggableError for InternalError {
    fn identifier(&self) -> String {
        self.identifier.clone()
    }

    fn reason(&self) -> String {
        self.reason.clone()
    }

    fn location(&self) -> Option<ErrorSource> {
        Some(self.location)
    }
}

/// Framework-level abort: a status and a reason, no machine code
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct Abort {
    pub status: StatusCode,
    pub reason: String,
    pub headers: HeaderMap,
}

impl Abort {
    /// Abort with the status's canonical reason phrase
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND).with_reason(reason)
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_reason(reason)
    }
}

impl From<StatusCode> for Abort {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

/// Validation error wrapping already-structured field failures
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .failures.len())]
pub struct AggregatedValidationError {
    pub failures: Vec<FieldFailure>,
}

impl AggregatedValidationError {
    pub fn new(failures: Vec<FieldFailure>) -> Self {
        Self { failures }
    }

    pub fn push(&mut self, failure: FieldFailure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FromIterator<FieldFailure> for AggregatedValidationError {
    fn from_iter<I: IntoIterator<Item = FieldFailure>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Outcome of validating one field, as produced by a validation framework
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Key of the validated field
    pub key: String,
    /// Description in `code:reason[:values]` form, if the validator set one
    pub custom_failure_description: Option<String>,
    /// Generic description from the validator
    pub failure_description: Option<String>,
}

impl ValidationResult {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_custom_description(mut self, description: impl Into<String>) -> Self {
        self.custom_failure_description = Some(description.into());
        self
    }

    pub fn with_failure_description(mut self, description: impl Into<String>) -> Self {
        self.failure_description = Some(description.into());
        self
    }
}

/// Validation error wrapping raw per-field results
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe_results(.failures))]
pub struct ValidationsError {
    pub failures: Vec<ValidationResult>,
}

impl ValidationsError {
    pub fn new(failures: Vec<ValidationResult>) -> Self {
        Self { failures }
    }
}

fn describe_results(failures: &[ValidationResult]) -> String {
    failures
        .iter()
        .map(|result| {
            let description = result
                .custom_failure_description
                .as_deref()
                .or(result.failure_description.as_deref())
                .unwrap_or("is invalid");
            format!("{} {}", result.key, description)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Any error raised while handling a request, tagged by category.
///
/// Variants are listed in classification priority order.
///
/// Returning an `AppError` from a handler only yields a redacted response.
/// The diagnostic log record and the environment-aware body come from the
/// [`crate::api::middleware::translate_errors`] layer, which must wrap every
/// route that can fail.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Coded(Box<dyn CodedError>),

    #[error("{0}")]
    AggregatedValidation(AggregatedValidationError),

    #[error("{0}")]
    FrameworkValidation(ValidationsError),

    #[error("{0}")]
    Abort(Abort),

    #[error("{0}")]
    Debuggable(Box<dyn DebuggableError>),

    #[error("{0:#}")]
    Unclassified(anyhow::Error),
}

impl AppError {
    pub fn coded(error: impl CodedError) -> Self {
        Self::Coded(Box::new(error))
    }

    pub fn debuggable(error: impl DebuggableError) -> Self {
        Self::Debuggable(Box::new(error))
    }

    /// Wrap a plain message as an unclassified error
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Unclassified(anyhow::Error::msg(message))
    }

    pub fn category(&self) -> super::ErrorCategory {
        use super::ErrorCategory;

        match self {
            Self::Coded(_) => ErrorCategory::Coded,
            Self::AggregatedValidation(_) => ErrorCategory::AggregatedValidation,
            Self::FrameworkValidation(_) => ErrorCategory::FrameworkValidation,
            Self::Abort(_) => ErrorCategory::Abort,
            Self::Debuggable(_) => ErrorCategory::Debuggable,
            Self::Unclassified(_) => ErrorCategory::Unclassified,
        }
    }

    /// Source location carried by the error, if any
    pub fn location(&self) -> Option<ErrorSource> {
        match self {
            Self::Debuggable(error) => error.location(),
            _ => None,
        }
    }
}

impl From<AggregatedValidationError> for AppError {
    fn from(error: AggregatedValidationError) -> Self {
        Self::AggregatedValidation(error)
    }
}

impl From<ValidationsError> for AppError {
    fn from(error: ValidationsError) -> Self {
        Self::FrameworkValidation(error)
    }
}

impl From<Abort> for AppError {
    fn from(error: Abort) -> Self {
        Self::Abort(error)
    }
}

impl From<InternalError> for AppError {
    fn from(error: InternalError) -> Self {
        Self::debuggable(error)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Abort(Abort::new(rejection.status()).with_reason(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Abort(Abort::new(rejection.status()).with_reason(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Abort(Abort::new(rejection.status()).with_reason(rejection.body_text()))
    }
}

/// Recover the most specific category from a type-erased error.
///
/// Concrete category types are tried in priority order; anything else is
/// unclassified.
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<AppError>() {
            Ok(app_error) => return app_error,
            Err(error) => error,
        };
        let error = match error.downcast::<AggregatedValidationError>() {
            Ok(validation) => return Self::AggregatedValidation(validation),
            Err(error) => error,
        };
        let error = match error.downcast::<ValidationsError>() {
            Ok(validation) => return Self::FrameworkValidation(validation),
            Err(error) => error,
        };
        let error = match error.downcast::<Abort>() {
            Ok(abort) => return Self::Abort(abort),
            Err(error) => error,
        };
        let error = match error.downcast::<InternalError>() {
            Ok(internal) => return Self::debuggable(internal),
            Err(error) => error,
        };

        Self::Unclassified(error)
    }
}

impl From<&str> for AppError {
    fn from(message: &str) -> Self {
        Self::msg(message.to_string())
    }
}

impl From<String> for AppError {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

/// A raised [`AppError`] travelling in response extensions to the
/// translation middleware
#[derive(Debug, Clone)]
pub struct RaisedError(pub Arc<AppError>);

/// Renders a redacted response and attaches the error for the translation
/// middleware, which replaces the response with the fully translated one.
/// Logs nothing: the middleware owns the single diagnostic record.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = render(classify(&self, Environment::Production));
        response
            .extensions_mut()
            .insert(RaisedError(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn test_abort_defaults_to_canonical_reason() {
        let abort = Abort::new(StatusCode::NOT_FOUND);
        assert_eq!(abort.reason, "Not Found");
        assert!(abort.headers.is_empty());
    }

    #[test]
    fn test_internal_error_captures_location() {
        let error = InternalError::new("db.lost", "connection reset");
        assert!(error.location.file.ends_with("kinds.rs"));
        assert!(error.location.line > 0);
        assert_eq!(error.to_string(), "db.lost: connection reset");
    }

    #[test]
    fn test_anyhow_downcast_priority() {
        let abort: AppError = anyhow::Error::new(Abort::not_found("gone")).into();
        assert_eq!(abort.category(), ErrorCategory::Abort);

        let validation: AppError =
            anyhow::Error::new(ValidationsError::new(vec![ValidationResult::new("name")])).into();
        assert_eq!(validation.category(), ErrorCategory::FrameworkValidation);

        let internal: AppError = anyhow::Error::new(InternalError::new("x", "y")).into();
        assert_eq!(internal.category(), ErrorCategory::Debuggable);
        assert!(internal.location().is_some());

        let other: AppError = anyhow::anyhow!("Something went wrong").into();
        assert_eq!(other.category(), ErrorCategory::Unclassified);
        assert_eq!(other.to_string(), "Something went wrong");
    }

    #[test]
    fn test_anyhow_wrapping_app_error_is_unwrapped() {
        let original = AppError::from(Abort::bad_request("bad"));
        let recovered: AppError = anyhow::Error::new(original).into();
        assert_eq!(recovered.category(), ErrorCategory::Abort);
    }

    #[test]
    fn test_plain_string_is_unclassified() {
        let error = AppError::from("Something went wrong");
        assert_eq!(error.category(), ErrorCategory::Unclassified);
        assert_eq!(error.to_string(), "Something went wrong");
    }

    #[test]
    fn test_validations_error_display() {
        let error = ValidationsError::new(vec![
            ValidationResult::new("name").with_failure_description("is required"),
            ValidationResult::new("age"),
        ]);
        assert_eq!(error.to_string(), "name is required, age is invalid");
    }

    #[test]
    fn test_into_response_is_redacted_and_carries_error() {
        let response = AppError::debuggable(InternalError::new("db.lost", "secret")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let raised = response.extensions().get::<RaisedError>().unwrap();
        assert_eq!(raised.0.category(), ErrorCategory::Debuggable);
    }

    #[test]
    fn test_into_response_alone_emits_no_event() {
        use std::sync::{Arc, Mutex};
        use tracing::{Event, Subscriber};
        use tracing_subscriber::{layer::Context, layer::SubscriberExt, Layer};

        #[derive(Clone, Default)]
        struct Count(Arc<Mutex<usize>>);

        impl<S: Subscriber> Layer<S> for Count {
            fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let count = Count::default();
        let subscriber = tracing_subscriber::registry().with(count.clone());
        tracing::subscriber::with_default(subscriber, || {
            let _ = AppError::debuggable(InternalError::new("db.lost", "secret")).into_response();
        });

        assert_eq!(*count.0.lock().unwrap(), 0);
    }
}
