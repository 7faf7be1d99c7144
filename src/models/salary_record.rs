//! Saved salary records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MonthlyVariables, PayMonth, SalaryCalculation};

/// A saved salary for one employee and month.
///
/// The id is derived from the employee and month, so saving again for the
/// same pair overwrites the earlier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// `{employee_id}-{year}-{month}`.
    pub id: String,
    /// The employee the salary is for.
    pub employee_id: String,
    /// The month the salary is for.
    pub month: PayMonth,
    /// The resolved inputs the figures were computed from.
    pub variables: MonthlyVariables,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// When the record was first saved.
    pub created_at: DateTime<Utc>,
    /// When the record was last overwritten.
    pub updated_at: DateTime<Utc>,
}

impl SalaryRecord {
    /// Builds the record id for an employee and month.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{PayMonth, SalaryRecord};
    ///
    /// let id = SalaryRecord::record_id("emp_001", PayMonth::new(2024, 5).unwrap());
    /// assert_eq!(id, "emp_001-2024-05");
    /// ```
    pub fn record_id(employee_id: &str, month: PayMonth) -> String {
        format!("{}-{}", employee_id, month)
    }

    /// Creates a record from a finished calculation.
    ///
    /// Stored figures are the rounded display values, so the record
    /// shows exactly what the user saw when saving.
    pub fn from_calculation(
        employee_id: &str,
        variables: MonthlyVariables,
        calculation: &SalaryCalculation,
        now: DateTime<Utc>,
    ) -> Self {
        let rounded = calculation.rounded();
        Self {
            id: Self::record_id(employee_id, calculation.month),
            employee_id: employee_id.to_string(),
            month: calculation.month,
            variables,
            gross_pay: rounded.gross_pay,
            total_deductions: rounded.total_deductions,
            net_pay: rounded.gross_pay.saturating_sub(rounded.total_deductions),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if net pay equals gross pay minus deductions.
    pub fn is_balanced(&self) -> bool {
        self.net_pay == self.gross_pay.saturating_sub(self.total_deductions)
    }

    /// Returns true if the computed figures match another record's.
    ///
    /// Timestamps are ignored.
    pub fn same_figures(&self, other: &SalaryRecord) -> bool {
        self.id == other.id
            && self.variables == other.variables
            && self.gross_pay == other.gross_pay
            && self.total_deductions == other.total_deductions
            && self.net_pay == other.net_pay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditTrace;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_calculation() -> SalaryCalculation {
        let total_deductions = dec("300") + dec("5000") / dec("30");
        SalaryCalculation {
            month: PayMonth::new(2024, 6).unwrap(),
            base_pay: dec("5000"),
            incentives: dec("0"),
            daily_rate: dec("5000") / dec("30"),
            daily_rate_with_incentives: dec("5000") / dec("30"),
            overtime_value: dec("0"),
            gross_pay: dec("5000"),
            total_salary_with_incentives: dec("5000"),
            absence_deduction: dec("0"),
            penalty_amount: dec("5000") / dec("30"),
            total_deductions,
            net_pay: dec("5000") - total_deductions,
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_from_calculation_rounds_and_balances() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let record = SalaryRecord::from_calculation(
            "emp_001",
            MonthlyVariables::default(),
            &create_calculation(),
            now,
        );

        assert_eq!(record.id, "emp_001-2024-06");
        assert_eq!(record.gross_pay, dec("5000"));
        assert_eq!(record.total_deductions, dec("466.67"));
        assert_eq!(record.net_pay, dec("4533.33"));
        assert!(record.is_balanced());
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn test_same_figures_ignores_timestamps() {
        let first = SalaryRecord::from_calculation(
            "emp_001",
            MonthlyVariables::default(),
            &create_calculation(),
            Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap(),
        );
        let second = SalaryRecord::from_calculation(
            "emp_001",
            MonthlyVariables::default(),
            &create_calculation(),
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
        );

        assert!(first.same_figures(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_record_id_is_zero_padded() {
        assert_eq!(
            SalaryRecord::record_id("emp_9", PayMonth::new(2025, 1).unwrap()),
            "emp_9-2025-01"
        );
    }
}
