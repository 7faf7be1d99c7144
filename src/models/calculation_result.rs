//! Salary calculation result models.
//!
//! This module contains the [`SalaryCalculation`] type returned by the pay
//! calculator, together with the audit trace structures that record each
//! step of the computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_for_display;

use super::PayMonth;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results worth a second look; they never stop a
/// calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(!trace.has_warning("NEGATIVE_NET_PAY"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Finds the step produced by the given rule.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// The result of computing one employee's salary for one month.
///
/// Figures are kept at full decimal precision; use
/// [`rounded`](SalaryCalculation::rounded) for the two-decimal display view.
///
/// `gross_pay` deliberately leaves the monthly incentive out;
/// `total_salary_with_incentives` is the separate figure that includes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCalculation {
    /// The month the salary is for.
    pub month: PayMonth,
    /// Base monthly pay.
    pub base_pay: Decimal,
    /// Monthly incentive in effect.
    pub incentives: Decimal,
    /// Base pay over a fixed 30-day month.
    pub daily_rate: Decimal,
    /// Base pay plus incentives over the calendar days in the month, or
    /// `daily_rate` when there is no incentive.
    pub daily_rate_with_incentives: Decimal,
    /// Overtime hours times overtime rate.
    pub overtime_value: Decimal,
    /// Base pay plus bonuses plus overtime.
    pub gross_pay: Decimal,
    /// Gross pay plus the monthly incentive.
    pub total_salary_with_incentives: Decimal,
    /// Deduction for absence days.
    pub absence_deduction: Decimal,
    /// Deduction for penalty days.
    pub penalty_amount: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Gross pay minus total deductions. May be negative.
    pub net_pay: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl SalaryCalculation {
    /// Returns a copy with every monetary figure rounded to two decimals.
    ///
    /// The audit trace is carried over unchanged.
    pub fn rounded(&self) -> Self {
        Self {
            month: self.month,
            base_pay: round_for_display(self.base_pay),
            incentives: round_for_display(self.incentives),
            daily_rate: round_for_display(self.daily_rate),
            daily_rate_with_incentives: round_for_display(self.daily_rate_with_incentives),
            overtime_value: round_for_display(self.overtime_value),
            gross_pay: round_for_display(self.gross_pay),
            total_salary_with_incentives: round_for_display(self.total_salary_with_incentives),
            absence_deduction: round_for_display(self.absence_deduction),
            penalty_amount: round_for_display(self.penalty_amount),
            total_deductions: round_for_display(self.total_deductions),
            net_pay: round_for_display(self.net_pay),
            audit_trace: self.audit_trace.clone(),
        }
    }
}
