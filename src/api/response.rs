//! Response types for the payroll API.
//!
//! This module defines the success payloads that are not plain domain
//! records, the error body, and the mapping from engine errors to HTTP
//! statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Advance;

/// Response body for `GET /employees/:id/advances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancesResponse {
    /// The employee the advances belong to.
    pub employee_id: String,
    /// Pending advances, oldest request first.
    pub advances: Vec<Advance>,
    /// Total still owed across unpaid advances.
    pub outstanding_balance: Decimal,
}

/// Response body for `POST /restore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
    /// Number of records now in the store.
    pub restored_records: usize,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::EmployeeNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::AdvanceNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("ADVANCE_NOT_FOUND", message),
            ),
            EngineError::EmployeeInUse { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "EMPLOYEE_IN_USE",
                    message,
                    "Delete the employee's salary records and advances first",
                ),
            ),
            EngineError::InvalidEmployee { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_EMPLOYEE", message),
            ),
            EngineError::InvalidAdvance { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ADVANCE", message),
            ),
            EngineError::InvalidAbsence { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ABSENCE", message),
            ),
            EngineError::InvalidPeriod { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("INVALID_PERIOD", message, "Month must be between 1 and 12"),
            ),
            EngineError::InconsistentAdvanceStatus { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "INCONSISTENT_ADVANCE_STATUS",
                    message,
                    "An advance is paid exactly when nothing remains to be repaid",
                ),
            ),
            EngineError::StoreUnavailable { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
            EngineError::SnapshotError { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_SNAPSHOT", message),
            ),
        }
    }
}
