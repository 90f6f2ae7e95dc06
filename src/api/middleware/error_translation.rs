use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::RaisedError;
use crate::translator::{translate, Environment, RequestContext};

/// Middleware that replaces responses carrying a raised [`crate::errors::AppError`]
/// with the translated error response.
///
/// The environment is taken from state on every request. Install with
/// `middleware::from_fn_with_state(state, translate_errors)` where
/// `Environment: FromRef<S>`.
pub async fn translate_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::from_request(&request);

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedError>() {
        Some(RaisedError(error)) => translate(&error, &context, environment),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Abort, AppError, InternalError};
    use axum::{
        body::Body,
        http::{self, header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn secret_failure() -> Result<&'static str, AppError> {
        Err(InternalError::new("vault.sealed", "unseal key missing").into())
    }

    async fn missing() -> Result<&'static str, AppError> {
        Err(Abort::not_found("Is not found").into())
    }

    async fn ok() -> &'static str {
        "fine"
    }

    fn app(environment: Environment) -> Router {
        Router::new()
            .route("/secret", get(secret_failure))
            .route("/missing", get(missing))
            .route("/ok", get(ok))
            .layer(middleware::from_fn_with_state(environment, translate_errors))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, String, Value) {
        let response = app
            .oneshot(http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, content_type, json)
    }

    #[tokio::test]
    async fn test_debug_mode_discloses_detail() {
        let (status, content_type, body) = call(app(Environment::Development), "/secret").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type, "application/json; charset=utf-8");
        assert_eq!(
            body,
            json!({"code": "vault.sealed", "reason": "unseal key missing", "values": []})
        );
    }

    #[tokio::test]
    async fn test_release_mode_redacts_detail() {
        let (status, _, body) = call(app(Environment::Production), "/secret").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internalApplicationError");
        assert_eq!(body["reason"], "The operation failed due to a server error.");

        let text = body.to_string();
        assert!(!text.contains("vault.sealed"));
        assert!(!text.contains("unseal key missing"));
    }

    #[tokio::test]
    async fn test_abort_passes_reason_through() {
        let (status, _, body) = call(app(Environment::Production), "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "Is not found");
        assert_eq!(body["reason"], "Is not found");
        assert!(body.get("failures").is_none());
    }

    #[tokio::test]
    async fn test_successful_response_untouched() {
        let response = app(Environment::Production)
            .oneshot(http::Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.extensions().get::<RaisedError>().is_none());
    }
}
