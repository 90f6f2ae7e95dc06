//! Turns a raised [`AppError`] into an HTTP response.
//!
//! Classification and redaction happen in [`classify`], the diagnostic
//! record is written by [`report`], and [`render`] produces the body.

pub mod classify;
pub mod render;
pub mod report;

use axum::{
    http::{HeaderMap, Request, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::errors::{AppError, ErrorCategory, ErrorResponse, FieldFailure};
use crate::metrics::ERRORS_TRANSLATED_TOTAL;

pub use classify::classify;
pub use render::{render, render_with, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
pub use report::report;

/// Runtime mode. Internal error detail is disclosed everywhere except
/// [`Environment::Production`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Testing,
}

impl Environment {
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown environment '{0}' (expected production, development or testing)")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// Request details kept for the diagnostic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub url: String,
    pub user_agent: Option<String>,
    pub request_id: String,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            user_agent: None,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Capture method, URL, user agent and request id (`x-request-id`, or a
    /// fresh one) before the request is handed on
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let headers = request.headers();
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            method: request.method().to_string(),
            url: request.uri().to_string(),
            user_agent: headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            request_id,
        }
    }
}

/// Outcome of classifying one error
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub code: String,
    pub reason: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub values: Vec<String>,
    pub failures: Option<Vec<FieldFailure>>,
}

impl ClassifiedError {
    /// Wire payload for this error
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code.clone(),
            reason: self.reason.clone(),
            values: self.values.clone(),
            failures: self.failures.clone(),
        }
    }
}

/// Classify, log and render one failed request
pub fn translate(error: &AppError, context: &RequestContext, environment: Environment) -> Response {
    let classified = classify(error, environment);

    report(error, &classified, context);

    ERRORS_TRANSLATED_TOTAL
        .with_label_values(&[classified.category.as_str(), classified.status.as_str()])
        .inc();

    render(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" testing ".parse::<Environment>().unwrap(), Environment::Testing);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_only_production_is_release() {
        assert!(Environment::Production.is_release());
        assert!(!Environment::Development.is_release());
        assert!(!Environment::Testing.is_release());
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_context_from_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/users?page=2")
            .header("user-agent", "curl/8.0")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let context = RequestContext::from_request(&request);
        assert_eq!(context.method, "POST");
        assert_eq!(context.url, "/users?page=2");
        assert_eq!(context.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(context.request_id, "req-42");
    }

    #[test]
    fn test_context_without_user_agent() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let context = RequestContext::from_request(&request);
        assert_eq!(context.method, "GET");
        assert!(context.user_agent.is_none());
        assert!(!context.request_id.is_empty());
    }
}
