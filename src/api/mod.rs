//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for employees, salaries,
//! advances, absences, and backup/restore.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AbsenceRequest, AdvanceRequest, SalaryRequest, StatusOverrideRequest, VariablesRequest,
};
pub use response::{AdvancesResponse, ApiError, ApiErrorResponse, RestoreResponse};
pub use state::AppState;
