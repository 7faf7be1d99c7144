//! Request types for the payroll API.
//!
//! Amount fields typed in by users go through the lenient amount
//! deserializers, so `"abc"`, `""` or `null` read as zero instead of
//! rejecting the whole request.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{lenient_amount, lenient_optional_amount};
use crate::error::EngineResult;
use crate::models::{AbsenceKind, AbsenceStatus, AdvanceStatus, MonthlyVariables, PayMonth};

/// Monthly variables as submitted from the salary form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariablesRequest {
    /// Overrides the employee's monthly incentive when set.
    #[serde(default, deserialize_with = "lenient_optional_amount")]
    pub incentives: Option<Decimal>,
    /// One-off bonuses.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub bonuses: Decimal,
    /// Days absent; counted from recorded absences when unset.
    #[serde(default, deserialize_with = "lenient_optional_amount")]
    pub absence_days: Option<Decimal>,
    /// Days docked as a penalty.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub penalty_days: Decimal,
    /// Amount recovered against advances this month.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub advances_deducted: Decimal,
    /// Staff purchases to deduct.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub purchases: Decimal,
    /// Overtime hours worked.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub overtime_rate: Decimal,
    /// Flat deduction for hours missed.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub hourly_deductions: Decimal,
}

impl From<VariablesRequest> for MonthlyVariables {
    fn from(req: VariablesRequest) -> Self {
        MonthlyVariables {
            incentives: req.incentives,
            bonuses: req.bonuses,
            absence_days: req.absence_days,
            penalty_days: req.penalty_days,
            advances_deducted: req.advances_deducted,
            purchases: req.purchases,
            overtime_hours: req.overtime_hours,
            overtime_rate: req.overtime_rate,
            hourly_deductions: req.hourly_deductions,
        }
    }
}

/// Request body for `POST /salaries/calculate` and `POST /salaries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRequest {
    /// The employee being paid.
    pub employee_id: String,
    /// Pay year.
    pub year: i32,
    /// Pay month, 1-12.
    pub month: u32,
    /// The month's variables.
    #[serde(default)]
    pub variables: VariablesRequest,
    /// Date stamped on advances settled by this save; defaults to today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl SalaryRequest {
    /// The requested pay month.
    pub fn pay_month(&self) -> EngineResult<PayMonth> {
        PayMonth::new(self.year, self.month)
    }
}

/// Request body for `POST /advances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// The employee taking the advance.
    pub employee_id: String,
    /// The amount advanced.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    /// Defaults to today.
    #[serde(default)]
    pub request_date: Option<NaiveDate>,
    /// When the advance should be repaid by.
    pub expected_repayment_date: NaiveDate,
    /// Why the advance was taken.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request body for `PATCH /advances/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOverrideRequest {
    /// The status to set.
    pub status: AdvanceStatus,
    /// Date stamped when marking paid; defaults to today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /absences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceRequest {
    /// Generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// The absent employee.
    pub employee_id: String,
    /// First day away.
    pub start_date: NaiveDate,
    /// Last day away.
    pub end_date: NaiveDate,
    /// Kind of absence.
    #[serde(rename = "type")]
    pub kind: AbsenceKind,
    /// Approval state.
    pub status: AbsenceStatus,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}
