//! Monthly variable pay inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The variable inputs for one employee's salary in one month.
///
/// Every amount defaults to zero when absent. `incentives` and
/// `absence_days` are optional: `None` means "take the employee's monthly
/// incentive" and "count the recorded absences" respectively. Once a
/// salary is saved both are resolved, so stored records always carry the
/// figures that were actually used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyVariables {
    /// Monthly incentive override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incentives: Option<Decimal>,
    /// One-off bonuses.
    pub bonuses: Decimal,
    /// Days absent, deducted at the daily rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absence_days: Option<Decimal>,
    /// Penalty days, deducted at the fixed 30-day daily rate.
    pub penalty_days: Decimal,
    /// Amount withheld to repay outstanding advances.
    pub advances_deducted: Decimal,
    /// Purchases charged against the salary.
    pub purchases: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Pay per overtime hour.
    pub overtime_rate: Decimal,
    /// Deductions for missed hours, as a flat amount.
    pub hourly_deductions: Decimal,
}

impl MonthlyVariables {
    /// Fills the optional inputs from their defaults.
    ///
    /// Values the caller set explicitly are kept.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::MonthlyVariables;
    /// use rust_decimal::Decimal;
    ///
    /// let variables = MonthlyVariables {
    ///     absence_days: Some(Decimal::ONE),
    ///     ..Default::default()
    /// };
    /// let resolved = variables.resolve(Decimal::new(500, 0), Decimal::new(3, 0));
    /// assert_eq!(resolved.incentives, Some(Decimal::new(500, 0)));
    /// assert_eq!(resolved.absence_days, Some(Decimal::ONE));
    /// ```
    pub fn resolve(self, default_incentives: Decimal, counted_absence_days: Decimal) -> Self {
        Self {
            incentives: Some(self.incentives.unwrap_or(default_incentives)),
            absence_days: Some(self.absence_days.unwrap_or(counted_absence_days)),
            ..self
        }
    }

    /// The incentive amount in effect, zero when unset.
    pub fn incentives_or_zero(&self) -> Decimal {
        self.incentives.unwrap_or_default()
    }

    /// The absence day count in effect, zero when unset.
    pub fn absence_days_or_zero(&self) -> Decimal {
        self.absence_days.unwrap_or_default()
    }
}
