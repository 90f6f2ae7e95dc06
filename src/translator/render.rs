use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue},
    response::Response,
};

use super::ClassifiedError;
use crate::errors::ErrorResponse;
use crate::metrics::ERROR_SERIALIZATION_FALLBACKS_TOTAL;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Encode the classified error as a JSON response
pub fn render(classified: ClassifiedError) -> Response {
    render_with(classified, |body| serde_json::to_vec(body))
}

/// Encode the classified error with `encode`.
///
/// If encoding fails the body becomes `Oops: <error>` as plain text. Status
/// and headers are the classified ones either way, with `Content-Type`
/// replaced.
pub fn render_with<F>(classified: ClassifiedError, encode: F) -> Response
where
    F: FnOnce(&ErrorResponse) -> Result<Vec<u8>, serde_json::Error>,
{
    let (content_type, bytes) = match encode(&classified.to_response()) {
        Ok(bytes) => (JSON_CONTENT_TYPE, bytes),
        Err(e) => {
            ERROR_SERIALIZATION_FALLBACKS_TOTAL.inc();
            (TEXT_CONTENT_TYPE, format!("Oops: {}", e).into_bytes())
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = classified.status;
    *response.headers_mut() = classified.headers;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

    response
}
