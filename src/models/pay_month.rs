//! Pay month model.
//!
//! Salaries are computed per calendar month. [`PayMonth`] is the validated
//! `(year, month)` pair every salary record and absence count is keyed on.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month a salary is computed for.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
///
/// let february = PayMonth::new(2024, 2).unwrap();
/// assert_eq!(february.days_in_month(), 29);
/// assert_eq!(february.to_string(), "2024-02");
/// assert!(PayMonth::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PayMonthParts", into = "PayMonthParts")]
pub struct PayMonth {
    first_day: NaiveDate,
}

/// Wire representation of a [`PayMonth`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayMonthParts {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1-12.
    pub month: u32,
}

impl PayMonth {
    /// Creates a pay month, rejecting month numbers outside 1-12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(EngineError::InvalidPeriod { year, month })
    }

    /// Returns the pay month containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Duration::days(i64::from(date.day0())),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month number, 1-12.
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// The actual number of days in this calendar month (28-31).
    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Duration::days(i64::from(self.days_in_month()) - 1)
    }

    /// Checks whether a date falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl TryFrom<PayMonthParts> for PayMonth {
    type Error = EngineError;

    fn try_from(parts: PayMonthParts) -> EngineResult<Self> {
        Self::new(parts.year, parts.month)
    }
}

impl From<PayMonth> for PayMonthParts {
    fn from(month: PayMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
        }
    }
}
