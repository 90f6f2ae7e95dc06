use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers::{
    abort_error, aggregated_validation_error, coded_error, coded_error_with_headers,
    create_user, debuggable_error, framework_validation_error, get_user, health, not_found,
    unclassified_error, AppState,
};
use super::middleware::translate_errors;
use super::openapi::ApiDoc;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // One route per error category
        .route("/demo/coded", get(coded_error))
        .route("/demo/coded/rate-limited", get(coded_error_with_headers))
        .route("/demo/validation/aggregated", get(aggregated_validation_error))
        .route("/demo/validation/framework", get(framework_validation_error))
        .route("/demo/abort", get(abort_error))
        .route("/demo/debuggable", get(debuggable_error))
        .route("/demo/unclassified", get(unclassified_error))
        .route("/demo/users", post(create_user))
        .route("/demo/users/:id", get(get_user))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI document
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .fallback(not_found)
        // Error translation must wrap the fallback too
        .layer(middleware::from_fn_with_state(state.clone(), translate_errors))
        // Failures are logged once by the translator, not by the trace layer
        .layer(TraceLayer::new_for_http().on_failure(()))
        .with_state(state)
}
