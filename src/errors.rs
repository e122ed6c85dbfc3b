//! Error types for sectorguide operations.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    /// The requested item was not found in the data store.
    NotFound,
    /// An item with the same identifier already exists.
    AlreadyExists,
    /// JSON serialization or deserialization failed.
    SerializationError(String),
    /// An internal storage system error occurred.
    Internal(String),
}

impl std::fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Item not found in data store"),
            Self::AlreadyExists => write!(f, "Item already exists in data store"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DataStoreError::AlreadyExists
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DataStoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DataStoreError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DataStoreError {
    fn from(e: serde_json::Error) -> Self {
        DataStoreError::SerializationError(e.to_string())
    }
}

impl std::error::Error for DataStoreError {}

/// Body of every error response: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable reason for the failure.
    pub detail: String,
}

/// An error returned by an HTTP handler, rendered as a status code and an [`ErrorDetail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The HTTP status of the response.
    pub status: StatusCode,
    /// The message placed in the `detail` field.
    pub detail: String,
}

impl ApiError {
    /// A 404 with the given detail.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    /// A 500 with the given detail.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }

    /// The 500 returned when a handler needs the store but none is configured.
    pub fn store_not_configured() -> Self {
        Self::internal("Database not configured")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.detail)
    }
}

impl std::error::Error for ApiError {}

impl From<DataStoreError> for ApiError {
    fn from(e: DataStoreError) -> Self {
        tracing::error!(error = %e, "document store operation failed");
        Self::internal(e.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        tracing::error!(error = %e, "record failed validation");
        Self::internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorDetail {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}
