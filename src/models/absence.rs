//! Absence model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::PayMonth;

/// The kind of absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// Sick leave.
    Sick,
    /// Annual leave.
    Annual,
    /// Unpaid leave.
    Unpaid,
    /// Anything else.
    Other,
}

/// Approval state of an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceStatus {
    /// Approved; counts towards salary deductions.
    Approved,
    /// Awaiting a decision.
    Pending,
    /// Rejected.
    Rejected,
}

/// A period an employee was away, inclusive of both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    /// Unique identifier for the absence.
    pub id: String,
    /// The absent employee.
    pub employee_id: String,
    /// First day away.
    pub start_date: NaiveDate,
    /// Last day away.
    pub end_date: NaiveDate,
    /// The kind of absence.
    #[serde(rename = "type")]
    pub kind: AbsenceKind,
    /// Approval state.
    pub status: AbsenceStatus,
    /// Free-text reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Absence {
    /// Creates an absence, rejecting an end date before the start date.
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: AbsenceKind,
        status: AbsenceStatus,
    ) -> EngineResult<Self> {
        let absence = Self {
            id: id.into(),
            employee_id: employee_id.into(),
            start_date,
            end_date,
            kind,
            status,
            reason: None,
        };
        absence.validate()?;
        Ok(absence)
    }

    /// Checks that the date range is not inverted.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidAbsence {
                absence_id: self.id.clone(),
                message: format!(
                    "end date {} precedes start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        Ok(())
    }

    /// Total days covered, counting both ends.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Days of this absence that fall inside the given month.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Absence, AbsenceKind, AbsenceStatus, PayMonth};
    /// use chrono::NaiveDate;
    ///
    /// let absence = Absence::new(
    ///     "abs_001",
    ///     "emp_001",
    ///     NaiveDate::from_ymd_opt(2024, 4, 29).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
    ///     AbsenceKind::Sick,
    ///     AbsenceStatus::Approved,
    /// )
    /// .unwrap();
    /// assert_eq!(absence.days_within(PayMonth::new(2024, 5).unwrap()), 2);
    /// assert_eq!(absence.days_within(PayMonth::new(2024, 4).unwrap()), 2);
    /// assert_eq!(absence.days_within(PayMonth::new(2024, 6).unwrap()), 0);
    /// ```
    pub fn days_within(&self, month: PayMonth) -> i64 {
        let start = self.start_date.max(month.first_day());
        let end = self.end_date.min(month.last_day());
        if end < start {
            0
        } else {
            (end - start).num_days() + 1
        }
    }
}
