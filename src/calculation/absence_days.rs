//! Absence day counting for a pay month.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Absence, AbsenceKind, AbsenceStatus, PayMonth};

/// Counts the days an employee was absent during a month.
///
/// Only approved absences of the given kinds count, and only the part of
/// each absence that falls inside the month. A day covered by two
/// overlapping absences is counted once.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::count_absence_days;
/// use payroll_engine::models::{Absence, AbsenceKind, AbsenceStatus, PayMonth};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
/// let absences = vec![
///     Absence::new("abs_1", "emp_001", date(5, 6), date(5, 7), AbsenceKind::Unpaid, AbsenceStatus::Approved).unwrap(),
///     Absence::new("abs_2", "emp_001", date(5, 20), date(5, 20), AbsenceKind::Sick, AbsenceStatus::Rejected).unwrap(),
/// ];
///
/// let days = count_absence_days(
///     &absences,
///     "emp_001",
///     PayMonth::new(2024, 5).unwrap(),
///     &[AbsenceKind::Unpaid, AbsenceKind::Sick],
/// );
/// assert_eq!(days, Decimal::new(2, 0));
/// ```
pub fn count_absence_days(
    absences: &[Absence],
    employee_id: &str,
    month: PayMonth,
    kinds: &[AbsenceKind],
) -> Decimal {
    let mut days: BTreeSet<NaiveDate> = BTreeSet::new();

    for absence in absences.iter().filter(|a| {
        a.employee_id == employee_id
            && a.status == AbsenceStatus::Approved
            && kinds.contains(&a.kind)
    }) {
        let start = absence.start_date.max(month.first_day());
        let end = absence.end_date.min(month.last_day());
        days.extend(start.iter_days().take_while(|d| *d <= end));
    }

    Decimal::from(days.len())
}
