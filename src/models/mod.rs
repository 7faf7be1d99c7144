//! Core data models for the payroll engine.
//!
//! This module contains all the domain records the engine reads and writes.

mod absence;
mod advance;
mod calculation_result;
mod employee;
mod monthly_variables;
mod pay_month;
mod salary_record;

pub use absence::{Absence, AbsenceKind, AbsenceStatus};
pub use advance::{Advance, AdvanceStatus};
pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, SalaryCalculation};
pub use employee::Employee;
pub use monthly_variables::MonthlyVariables;
pub use pay_month::{PayMonth, PayMonthParts};
pub use salary_record::SalaryRecord;
