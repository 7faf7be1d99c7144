//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every request gets a correlation id that is attached to its log lines.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{Absence, Employee, MonthlyVariables, PayMonth};
use crate::store::Snapshot;

use super::request::{AbsenceRequest, AdvanceRequest, SalaryRequest, StatusOverrideRequest};
use super::response::{AdvancesResponse, ApiError, ApiErrorResponse, RestoreResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees_handler).post(upsert_employee_handler))
        .route(
            "/employees/:id",
            get(get_employee_handler).delete(delete_employee_handler),
        )
        .route("/employees/:id/advances", get(employee_advances_handler))
        .route("/employees/:id/absences", get(employee_absences_handler))
        .route("/salaries", post(save_salary_handler))
        .route("/salaries/calculate", post(calculate_salary_handler))
        .route("/salaries/summary/:year/:month", get(monthly_summary_handler))
        .route("/advances", post(request_advance_handler))
        .route("/advances/:id", delete(delete_advance_handler))
        .route("/advances/:id/status", patch(override_status_handler))
        .route("/absences", post(record_absence_handler))
        .route("/absences/:id", delete(delete_absence_handler))
        .route("/backup", get(backup_handler))
        .route("/restore", post(restore_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Turns a body extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

/// Handler for GET /employees.
async fn list_employees_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().employees() {
        Ok(employees) => json_response(StatusCode::OK, employees),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /employees.
///
/// Creates the employee, or replaces the one with the same id.
async fn upsert_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let employee = match payload {
        Ok(Json(employee)) => employee,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Saving employee");

    match state.service().upsert_employee(employee) {
        Ok(employee) => json_response(StatusCode::OK, employee),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().employee(&id) {
        Ok(employee) => json_response(StatusCode::OK, employee),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /employees/:id.
async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().delete_employee(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/advances.
///
/// Returns the pending advances, oldest first, and the outstanding balance.
async fn employee_advances_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let service = state.service();
    let result = service.pending_advances(&id).and_then(|advances| {
        Ok(AdvancesResponse {
            outstanding_balance: service.outstanding_balance(&id)?,
            employee_id: id.clone(),
            advances,
        })
    });

    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/absences.
async fn employee_absences_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let service = state.service();
    match service.employee(&id).and_then(|_| service.absences_for(&id)) {
        Ok(absences) => json_response(StatusCode::OK, absences),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /salaries/calculate.
///
/// Computes the salary without saving it and returns the two-decimal view.
async fn calculate_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let month = match request.pay_month() {
        Ok(month) => month,
        Err(err) => return error_response(correlation_id, err),
    };

    let variables: MonthlyVariables = request.variables.into();
    match state
        .service()
        .calculate_salary(&request.employee_id, month, variables)
    {
        Ok(calculation) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                month = %month,
                net_pay = %calculation.net_pay,
                "Salary calculated"
            );
            json_response(StatusCode::OK, calculation.rounded())
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /salaries.
///
/// Saves the salary record and applies the advance deduction. Responds
/// 201 when the record is new and 200 when it replaced an existing one.
async fn save_salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary save request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let month = match request.pay_month() {
        Ok(month) => month,
        Err(err) => return error_response(correlation_id, err),
    };

    let today = today_or(request.today);
    let variables: MonthlyVariables = request.variables.into();
    match state
        .service()
        .save_salary(&request.employee_id, month, variables, today)
    {
        Ok(mut saved) => {
            info!(
                correlation_id = %correlation_id,
                record_id = %saved.record.id,
                net_pay = %saved.record.net_pay,
                applied = %saved.reconciliation.applied,
                "Salary saved"
            );
            saved.calculation = saved.calculation.rounded();
            let status = if saved.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            json_response(status, saved)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /salaries/summary/:year/:month.
async fn monthly_summary_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = PayMonth::new(year, month).and_then(|month| state.service().monthly_summary(month));
    match result {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /advances.
async fn request_advance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AdvanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        amount = %request.amount,
        "Processing advance request"
    );

    match state.service().request_advance(
        &request.employee_id,
        request.amount,
        today_or(request.request_date),
        request.expected_repayment_date,
        request.reason,
    ) {
        Ok(advance) => json_response(StatusCode::CREATED, advance),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PATCH /advances/:id/status.
async fn override_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusOverrideRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        advance_id = %id,
        status = %request.status,
        "Processing advance status override"
    );

    match state
        .service()
        .override_advance_status(&id, request.status, today_or(request.today))
    {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /advances/:id.
async fn delete_advance_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().delete_advance(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /absences.
async fn record_absence_handler(
    State(state): State<AppState>,
    payload: Result<Json<AbsenceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let id = request
        .id
        .unwrap_or_else(|| format!("abs_{}", Uuid::new_v4().simple()));
    let absence = Absence::new(
        id,
        request.employee_id,
        request.start_date,
        request.end_date,
        request.kind,
        request.status,
    )
    .map(|mut absence| {
        absence.reason = request.reason;
        absence
    });

    match absence.and_then(|absence| state.service().record_absence(absence)) {
        Ok(absence) => {
            info!(
                correlation_id = %correlation_id,
                absence_id = %absence.id,
                employee_id = %absence.employee_id,
                "Absence recorded"
            );
            json_response(StatusCode::CREATED, absence)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /absences/:id.
async fn delete_absence_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().delete_absence(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_response(
            StatusCode::NOT_FOUND,
            ApiError::new("ABSENCE_NOT_FOUND", format!("Absence not found: {}", id)),
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /backup.
async fn backup_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().backup() {
        Ok(snapshot) => {
            info!(
                correlation_id = %correlation_id,
                records = snapshot.record_count(),
                "Backup exported"
            );
            json_response(StatusCode::OK, snapshot)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /restore.
///
/// Replaces every record with the snapshot in the body.
async fn restore_handler(
    State(state): State<AppState>,
    payload: Result<Json<Snapshot>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let snapshot = match payload {
        Ok(Json(snapshot)) => snapshot,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        records = snapshot.record_count(),
        "Processing restore request"
    );

    match state.service().restore(snapshot) {
        Ok(restored_records) => json_response(StatusCode::OK, RestoreResponse { restored_records }),
        Err(err) => error_response(correlation_id, err),
    }
}
