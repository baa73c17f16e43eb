pub mod food;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod order;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRef, Path, Query,
    },
    http::StatusCode,
    response::Json,
    BoxError,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::models::{RepositoryError, ServiceError};
use crate::observability::Metrics;
use crate::services::{FoodService, OrderService};

pub use food::*;
pub use health::*;
pub use metrics::*;
pub use middleware::*;
pub use order::*;

/// Error half of every handler's return type: a status and a `{ "error": ... }` body
pub type ApiError = (StatusCode, Json<Value>);

/// Shared application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub food_service: Arc<FoodService>,
    pub order_service: Arc<OrderService>,
    pub metrics: Arc<Metrics>,
}

impl FromRef<AppState> for Arc<Metrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Map service errors to HTTP responses. Internals are logged, never echoed.
pub(crate) fn service_error_to_response(err: ServiceError) -> ApiError {
    match err {
        ServiceError::FoodNotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, "Food item not found")
        }
        ServiceError::OrderNotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, "Order not found")
        }
        ServiceError::InvalidTransition { .. } => {
            warn!("{}", err);
            error_response(StatusCode::CONFLICT, "Invalid status transition")
        }
        ServiceError::Validation { source } => {
            error_response(StatusCode::BAD_REQUEST, source.to_string())
        }
        ServiceError::Repository { source } => {
            crate::error_with_trace!(error = %source, "Repository failure");
            match source {
                RepositoryError::ConnectionFailed | RepositoryError::Timeout => {
                    error_response(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
                }
                RepositoryError::Database { .. } | RepositoryError::InvalidData { .. } => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            }
        }
    }
}

/// Turn errors raised by the tower middleware stack into JSON responses
pub(crate) async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        crate::warn_with_trace!("Request timed out");
        error_response(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        crate::error_with_trace!(error = %err, "Unhandled middleware error");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

pub(crate) async fn route_not_found() -> ApiError {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

pub(crate) async fn method_not_allowed() -> ApiError {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Unwrap a numeric `:id` path segment, answering 400 for anything else
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(error = %rejection, "Invalid path parameter");
        error_response(StatusCode::BAD_REQUEST, "Invalid id")
    })
}

/// Unwrap a JSON body, answering 400 when it does not parse
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection, "Invalid request body");
        error_response(StatusCode::BAD_REQUEST, "Invalid request body")
    })
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(params)| params).map_err(|rejection| {
        warn!(error = %rejection, "Invalid query parameters");
        error_response(StatusCode::BAD_REQUEST, "Invalid query parameters")
    })
}
