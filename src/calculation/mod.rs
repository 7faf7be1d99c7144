//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions the engine is built around:
//! amount parsing and display rounding, the monthly pay calculator, the
//! advance reconciler with its manual status override, and absence day
//! counting.

mod absence_days;
mod advance_reconciler;
mod amount;
mod pay_calculator;

pub use absence_days::count_absence_days;
pub use advance_reconciler::{
    AdvancePayoff, ReconciliationResult, StatusOverridePolicy, StatusOverrideResult,
    apply_deduction, override_status,
};
pub use amount::{
    DISPLAY_DECIMAL_PLACES, lenient_amount, lenient_optional_amount, parse_amount,
    parse_non_negative_amount, round_for_display,
};
pub use pay_calculator::{FIXED_MONTH_DAYS, compute_salary, daily_rate, daily_rate_with_incentives};
