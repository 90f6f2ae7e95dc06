use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRef, Path, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::errors::{
    Abort, AggregatedValidationError, AppError, CodedError, FieldFailure, InternalError,
    ValidationResult, ValidationsError,
};
use crate::translator::Environment;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub environment: Environment,
}

impl FromRef<AppState> for Environment {
    fn from_ref(state: &AppState) -> Self {
        state.environment
    }
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub environment: String,
}

/// Payload for creating a user
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A created user
#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl NewUser {
    fn validate(&self) -> Result<(), ValidationsError> {
        let mut failures = Vec::new();

        let name_length = self.name.chars().count();
        if name_length == 0 {
            failures.push(
                ValidationResult::new("name")
                    .with_custom_description("nameIsRequired:Name is required"),
            );
        } else if !(3..=32).contains(&name_length) {
            failures.push(ValidationResult::new("name").with_custom_description(
                "nameLengthMustBeBetween:Name length must be between 3 and 32:3, 32",
            ));
        }

        if !self.email.contains('@') {
            failures.push(
                ValidationResult::new("email").with_failure_description("is not a valid email"),
            );
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationsError::new(failures))
        }
    }
}

/// Domain errors raised by the demo inventory endpoints
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("item {sku} is out of stock")]
    OutOfStock { sku: String },

    #[error("reservations are rate limited for {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl CodedError for InventoryError {
    fn code(&self) -> String {
        match self {
            Self::OutOfStock { .. } => "outOfStock".to_string(),
            Self::RateLimited { .. } => "reservationsRateLimited".to_string(),
        }
    }

    fn reason(&self) -> String {
        match self {
            Self::OutOfStock { .. } => "Item is out of stock".to_string(),
            Self::RateLimited { .. } => "Too many reservations, retry later".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::OutOfStock { .. } => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Self::RateLimited { retry_after_secs } = self {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
        }
        headers
    }

    fn values(&self) -> Vec<String> {
        match self {
            Self::OutOfStock { sku } => vec![sku.clone()],
            Self::RateLimited { retry_after_secs } => vec![retry_after_secs.to_string()],
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "fullerror".to_string(),
        environment: state.environment.to_string(),
    })
}

/// Create a user
#[utoipa::path(
    post,
    path = "/demo/users",
    tag = "demo",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    )
)]
pub async fn create_user(
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(new_user) = payload?;
    new_user.validate()?;

    info!(name = %new_user.name, "Created user");

    Ok((
        StatusCode::CREATED,
        Json(User {
            id: 1,
            name: new_user.name,
            email: new_user.email,
        }),
    ))
}

/// Fetch a user by id
#[utoipa::path(
    get,
    path = "/demo/users/{id}",
    tag = "demo",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_user(id: Result<Path<u64>, PathRejection>) -> Result<Json<User>, AppError> {
    let Path(id) = id?;

    if id != 1 {
        return Err(Abort::not_found(format!("User {} not found", id)).into());
    }

    Ok(Json(User {
        id,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    }))
}

pub async fn coded_error() -> Result<(), AppError> {
    Err(AppError::coded(InventoryError::OutOfStock {
        sku: "SKU-1042".to_string(),
    }))
}

pub async fn coded_error_with_headers() -> Result<(), AppError> {
    Err(AppError::coded(InventoryError::RateLimited {
        retry_after_secs: 30,
    }))
}

pub async fn aggregated_validation_error() -> Result<(), AppError> {
    let error: AggregatedValidationError = [
        FieldFailure::from_coded(
            "sku",
            &InventoryError::OutOfStock {
                sku: "SKU-1042".to_string(),
            },
        ),
        FieldFailure::new(
            "quantity",
            "quantityMustBeBetween",
            "Quantity must be between 1 and 10",
            vec!["1".to_string(), "10".to_string()],
        ),
    ]
    .into_iter()
    .collect();

    Err(error.into())
}

pub async fn framework_validation_error() -> Result<(), AppError> {
    NewUser {
        name: String::new(),
        email: "nobody".to_string(),
    }
    .validate()?;

    Ok(())
}

pub async fn abort_error() -> Result<(), AppError> {
    Err(Abort::not_found("Is not found").into())
}

pub async fn debuggable_error() -> Result<(), AppError> {
    Err(InternalError::new(
        "database.connectionLost",
        "connection to 10.0.0.5:5432 reset by peer",
    )
    .into())
}

pub async fn unclassified_error() -> Result<(), AppError> {
    Err(anyhow::anyhow!("Something went wrong").into())
}

pub async fn not_found() -> AppError {
    Abort::new(StatusCode::NOT_FOUND).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_passes() {
        let user = NewUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_invalid_user_collects_every_failure() {
        let user = NewUser {
            name: "Al".to_string(),
            email: "nope".to_string(),
        };
        let error = user.validate().unwrap_err();
        assert_eq!(error.failures.len(), 2);
        assert_eq!(error.failures[0].key, "name");
        assert_eq!(error.failures[1].key, "email");
        assert!(error.failures[1].custom_failure_description.is_none());
    }

    #[test]
    fn test_inventory_error_headers() {
        let error = InventoryError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(error.headers()[header::RETRY_AFTER], "30");
        assert_eq!(error.values(), vec!["30"]);
    }
}
