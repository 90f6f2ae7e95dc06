use utoipa::OpenApi;

use crate::api::handlers::{HealthResponse, NewUser, User};
use crate::errors::{ErrorResponse, FieldFailure};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fullerror",
        version = "0.1.0",
        description = "Structured JSON error responses for axum services. Every failed request is answered with a stable code, a reason, substitution values and, for validation errors, field-level failures.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::create_user,
        crate::api::handlers::get_user,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldFailure,
            HealthResponse,
            NewUser,
            User,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "demo", description = "Endpoints that raise each error category")
    )
)]
pub struct ApiDoc;
