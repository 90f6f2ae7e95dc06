//! Structured JSON error responses for axum services.
//!
//! Handlers return [`errors::AppError`]; the
//! [`api::middleware::translate_errors`] middleware classifies the error,
//! logs one diagnostic record and answers with an [`errors::ErrorResponse`].

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod translator;

pub use errors::{AppError, ErrorResponse, FieldFailure};
pub use translator::Environment;
