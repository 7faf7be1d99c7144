//! Error types for the payroll engine.
//!
//! The pay calculator and the advance reconciler are total and never fail;
//! everything here comes from configuration, record validation, the record
//! store, or the manual status override.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::AdvanceStatus;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was looked up.
        id: String,
    },

    /// The employee is still referenced by salary records or advances.
    #[error("Employee '{id}' is still referenced by {references} record(s)")]
    EmployeeInUse {
        /// The employee id.
        id: String,
        /// Number of salary records and advances pointing at the employee.
        references: usize,
    },

    /// No advance exists with the given id.
    #[error("Advance not found: {id}")]
    AdvanceNotFound {
        /// The advance id that was looked up.
        id: String,
    },

    /// An employee record was invalid.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An advance request was invalid.
    #[error("Invalid advance '{advance_id}': {message}")]
    InvalidAdvance {
        /// The id of the advance.
        advance_id: String,
        /// A description of what made the advance invalid.
        message: String,
    },

    /// An absence record was invalid.
    #[error("Invalid absence '{absence_id}': {message}")]
    InvalidAbsence {
        /// The id of the absence.
        absence_id: String,
        /// A description of what made the absence invalid.
        message: String,
    },

    /// A year/month pair does not name a calendar month.
    #[error("Invalid pay period {year}-{month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (expected 1-12).
        month: u32,
    },

    /// A manual status edit would break the paid-iff-settled rule.
    #[error(
        "Advance '{advance_id}' cannot be marked {status} with {remaining_amount} remaining"
    )]
    InconsistentAdvanceStatus {
        /// The id of the advance.
        advance_id: String,
        /// The status that was requested.
        status: AdvanceStatus,
        /// The outstanding balance at the time of the edit.
        remaining_amount: Decimal,
    },

    /// The record store could not be accessed.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// A backup snapshot could not be encoded or decoded.
    #[error("Snapshot error: {message}")]
    SnapshotError {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
