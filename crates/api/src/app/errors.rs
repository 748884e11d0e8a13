//! Error responses. Every failure body has the same shape:
//! `{"errors": ["..."]}`.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use supplyhub_auth::{AuthError, AuthzError};
use supplyhub_catalog::{CatalogError, RepositoryError};

/// Message returned for every unexpected fault. Details are only logged.
pub const INTERNAL_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}

pub fn json_error(status: StatusCode, errors: Vec<String>) -> Response {
    (status, Json(ErrorBody { errors })).into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid input, rejected before any service runs.
    #[error("invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("resource not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => json_error(StatusCode::BAD_REQUEST, errors),
            ApiError::Unauthorized => json_error(
                StatusCode::UNAUTHORIZED,
                vec!["Authentication is required.".to_string()],
            ),
            ApiError::Forbidden(_) => json_error(
                StatusCode::FORBIDDEN,
                vec!["You are not allowed to perform this operation.".to_string()],
            ),
            ApiError::NotFound => json_error(
                StatusCode::NOT_FOUND,
                vec!["The requested resource was not found.".to_string()],
            ),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, vec![INTERNAL_ERROR.to_string()])
            }
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => ApiError::Unauthorized,
            AuthzError::Forbidden(requirement) => ApiError::Forbidden(requirement),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::internal(err)
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound,
            other => ApiError::internal(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::internal(err)
    }
}

/// `CatchPanicLayer` handler: log the payload, answer with the generic 500.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
