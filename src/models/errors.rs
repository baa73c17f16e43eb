use thiserror::Error;

use super::OrderStatus;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Food item not found: {id}")]
    FoodNotFound { id: i64 },

    #[error("Order not found: {id}")]
    OrderNotFound { id: i64 },

    #[error("Invalid status transition for order {id}: {from} -> {to}")]
    InvalidTransition {
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("{source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Timeout occurred during operation")]
    Timeout,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Invalid stored data: {message}")]
    InvalidData { message: String },
}

/// Validation errors for input data
///
/// The `Display` text of each variant is what clients see in the `error` field.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields { fields: Vec<String> },

    #[error("Missing required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid status value")]
    InvalidStatus { value: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
