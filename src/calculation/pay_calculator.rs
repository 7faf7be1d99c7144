//! Monthly salary calculation.
//!
//! This module turns an employee's base pay, incentive and a month's
//! variable inputs into gross pay, total deductions and net pay.
//!
//! Two daily rates are in play and they intentionally disagree:
//! `daily_rate` always divides by a fixed 30-day month, while
//! `daily_rate_with_incentives` divides by the real number of days in the
//! selected month. Absences use the latter when an incentive is paid;
//! penalties always use the former.

use rust_decimal::Decimal;

use crate::models::{
    AuditStep, AuditTrace, AuditWarning, MonthlyVariables, PayMonth, SalaryCalculation,
};

use super::round_for_display;

/// The month length `daily_rate` is based on, regardless of calendar.
pub const FIXED_MONTH_DAYS: u32 = 30;

/// Arithmetic that saturates at the `Decimal` bounds and remembers which
/// steps had to.
#[derive(Debug, Default)]
struct Saturation {
    steps: Vec<&'static str>,
}

impl Saturation {
    fn note(&mut self, step: &'static str) {
        if !self.steps.contains(&step) {
            self.steps.push(step);
        }
    }

    fn add(&mut self, step: &'static str, a: Decimal, b: Decimal) -> Decimal {
        a.checked_add(b).unwrap_or_else(|| {
            self.note(step);
            a.saturating_add(b)
        })
    }

    fn sub(&mut self, step: &'static str, a: Decimal, b: Decimal) -> Decimal {
        a.checked_sub(b).unwrap_or_else(|| {
            self.note(step);
            a.saturating_sub(b)
        })
    }

    fn mul(&mut self, step: &'static str, a: Decimal, b: Decimal) -> Decimal {
        a.checked_mul(b).unwrap_or_else(|| {
            self.note(step);
            a.saturating_mul(b)
        })
    }
}

/// Base pay over the fixed 30-day month.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::daily_rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(daily_rate(Decimal::new(3000, 0)), Decimal::new(100, 0));
/// ```
pub fn daily_rate(base_pay: Decimal) -> Decimal {
    base_pay / Decimal::from(FIXED_MONTH_DAYS)
}

/// Base pay plus incentives over the calendar days of `month`.
///
/// Falls back to [`daily_rate`] when there is no positive incentive. The
/// sum saturates at the `Decimal` bounds.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::daily_rate_with_incentives;
/// use payroll_engine::models::PayMonth;
/// use rust_decimal::Decimal;
///
/// let february = PayMonth::new(2023, 2).unwrap();
/// assert_eq!(
///     daily_rate_with_incentives(Decimal::new(2600, 0), Decimal::new(200, 0), february),
///     Decimal::new(100, 0)
/// );
/// assert_eq!(
///     daily_rate_with_incentives(Decimal::new(3000, 0), Decimal::ZERO, february),
///     Decimal::new(100, 0)
/// );
/// ```
pub fn daily_rate_with_incentives(base_pay: Decimal, incentives: Decimal, month: PayMonth) -> Decimal {
    if incentives > Decimal::ZERO {
        base_pay.saturating_add(incentives) / Decimal::from(month.days_in_month())
    } else {
        daily_rate(base_pay)
    }
}

/// Computes one month's salary.
///
/// `incentives` is the monthly incentive in effect (the employee's default
/// or an override). `variables.incentives` is not consulted here, and
/// `variables.absence_days` is read as zero when unset.
///
/// The function is total and pure: identical inputs give identical output,
/// and negative inputs are carried through rather than rejected. Callers
/// are expected to keep base pay and incentives non-negative. A figure
/// that would leave the `Decimal` range saturates at the bound and the
/// trace carries an `AMOUNT_OVERFLOW` warning naming the steps affected.
///
/// # Algorithm
///
/// 1. `daily_rate = base_pay / 30`
/// 2. `daily_rate_with_incentives = (base_pay + incentives) / days_in_month`
///    if `incentives > 0`, else `daily_rate`
/// 3. `overtime_value = overtime_hours * overtime_rate`
/// 4. `gross_pay = base_pay + bonuses + overtime_value`
/// 5. `absence_deduction = absence_days * (incentives > 0 ? daily_rate_with_incentives : daily_rate)`
/// 6. `penalty_amount = penalty_days * daily_rate`
/// 7. `total_deductions = purchases + advances_deducted + absence_deduction
///    + hourly_deductions + penalty_amount`
/// 8. `net_pay = gross_pay - total_deductions` (not clamped)
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_salary;
/// use payroll_engine::models::{MonthlyVariables, PayMonth};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let variables = MonthlyVariables {
///     bonuses: dec("200"),
///     overtime_hours: dec("10"),
///     overtime_rate: dec("20.83"),
///     absence_days: Some(dec("2")),
///     penalty_days: dec("1"),
///     purchases: dec("300"),
///     advances_deducted: dec("500"),
///     ..Default::default()
/// };
///
/// let result = compute_salary(dec("5000"), dec("500"), &variables, PayMonth::new(2024, 1).unwrap());
/// let shown = result.rounded();
/// assert_eq!(shown.gross_pay, dec("5408.30"));
/// assert_eq!(shown.total_deductions, dec("1321.51"));
/// assert_eq!(shown.net_pay, dec("4086.79"));
/// ```
pub fn compute_salary(
    base_pay: Decimal,
    incentives: Decimal,
    variables: &MonthlyVariables,
    month: PayMonth,
) -> SalaryCalculation {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut saturation = Saturation::default();
    let has_incentive = incentives > Decimal::ZERO;

    // Step 1: fixed 30-day daily rate
    let daily = daily_rate(base_pay);
    steps.push(AuditStep {
        step_number: 1,
        rule_id: "daily_rate".to_string(),
        rule_name: "Daily Rate".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "month_days": FIXED_MONTH_DAYS
        }),
        output: serde_json::json!({ "daily_rate": daily.to_string() }),
        reasoning: format!(
            "${} / {} days = ${}",
            base_pay.normalize(),
            FIXED_MONTH_DAYS,
            round_for_display(daily)
        ),
    });

    // Step 2: calendar daily rate including incentives
    let daily_with_incentives = daily_rate_with_incentives(base_pay, incentives, month);
    if has_incentive && base_pay.checked_add(incentives).is_none() {
        saturation.note("daily_rate_with_incentives");
    }
    let reasoning = if has_incentive {
        format!(
            "(${} + ${}) / {} days in {} = ${}",
            base_pay.normalize(),
            incentives.normalize(),
            month.days_in_month(),
            month,
            round_for_display(daily_with_incentives)
        )
    } else {
        "No incentive paid - using the 30-day daily rate".to_string()
    };
    steps.push(AuditStep {
        step_number: 2,
        rule_id: "daily_rate_with_incentives".to_string(),
        rule_name: "Daily Rate With Incentives".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "incentives": incentives.to_string(),
            "days_in_month": month.days_in_month()
        }),
        output: serde_json::json!({
            "daily_rate_with_incentives": daily_with_incentives.to_string(),
            "incentive_applied": has_incentive
        }),
        reasoning,
    });

    // Step 3: overtime
    let overtime_value = saturation.mul(
        "overtime_value",
        variables.overtime_hours,
        variables.overtime_rate,
    );
    steps.push(AuditStep {
        step_number: 3,
        rule_id: "overtime_value".to_string(),
        rule_name: "Overtime Value".to_string(),
        input: serde_json::json!({
            "overtime_hours": variables.overtime_hours.to_string(),
            "overtime_rate": variables.overtime_rate.to_string()
        }),
        output: serde_json::json!({ "overtime_value": overtime_value.to_string() }),
        reasoning: format!(
            "{}h x ${} = ${}",
            variables.overtime_hours.normalize(),
            variables.overtime_rate.normalize(),
            round_for_display(overtime_value)
        ),
    });

    // Step 4: gross pay (incentives excluded)
    let gross_pay = saturation.add("gross_pay", base_pay, variables.bonuses);
    let gross_pay = saturation.add("gross_pay", gross_pay, overtime_value);
    let total_salary_with_incentives = saturation.add("gross_pay", gross_pay, incentives);
    steps.push(AuditStep {
        step_number: 4,
        rule_id: "gross_pay".to_string(),
        rule_name: "Gross Pay".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "bonuses": variables.bonuses.to_string(),
            "overtime_value": overtime_value.to_string(),
            "incentives": incentives.to_string()
        }),
        output: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_salary_with_incentives": total_salary_with_incentives.to_string()
        }),
        reasoning: format!(
            "${} + ${} bonuses + ${} overtime = ${} (${} with incentives)",
            base_pay.normalize(),
            variables.bonuses.normalize(),
            round_for_display(overtime_value),
            round_for_display(gross_pay),
            round_for_display(total_salary_with_incentives)
        ),
    });

    // Step 5: absences
    let absence_days = variables.absence_days_or_zero();
    let absence_rate = if has_incentive {
        daily_with_incentives
    } else {
        daily
    };
    let absence_deduction = saturation.mul("absence_deduction", absence_days, absence_rate);
    steps.push(AuditStep {
        step_number: 5,
        rule_id: "absence_deduction".to_string(),
        rule_name: "Absence Deduction".to_string(),
        input: serde_json::json!({
            "absence_days": absence_days.to_string(),
            "rate": absence_rate.to_string()
        }),
        output: serde_json::json!({ "absence_deduction": absence_deduction.to_string() }),
        reasoning: format!(
            "{} days x ${} = ${}",
            absence_days.normalize(),
            round_for_display(absence_rate),
            round_for_display(absence_deduction)
        ),
    });

    // Step 6: penalties always at the 30-day rate
    let penalty_amount = saturation.mul("penalty_amount", variables.penalty_days, daily);
    steps.push(AuditStep {
        step_number: 6,
        rule_id: "penalty_amount".to_string(),
        rule_name: "Penalty Amount".to_string(),
        input: serde_json::json!({
            "penalty_days": variables.penalty_days.to_string(),
            "daily_rate": daily.to_string()
        }),
        output: serde_json::json!({ "penalty_amount": penalty_amount.to_string() }),
        reasoning: format!(
            "{} days x ${} = ${}",
            variables.penalty_days.normalize(),
            round_for_display(daily),
            round_for_display(penalty_amount)
        ),
    });

    // Step 7: total deductions
    let total_deductions = [
        variables.advances_deducted,
        absence_deduction,
        variables.hourly_deductions,
        penalty_amount,
    ]
    .into_iter()
    .fold(variables.purchases, |total, amount| {
        saturation.add("total_deductions", total, amount)
    });
    steps.push(AuditStep {
        step_number: 7,
        rule_id: "total_deductions".to_string(),
        rule_name: "Total Deductions".to_string(),
        input: serde_json::json!({
            "purchases": variables.purchases.to_string(),
            "advances_deducted": variables.advances_deducted.to_string(),
            "absence_deduction": absence_deduction.to_string(),
            "hourly_deductions": variables.hourly_deductions.to_string(),
            "penalty_amount": penalty_amount.to_string()
        }),
        output: serde_json::json!({ "total_deductions": total_deductions.to_string() }),
        reasoning: format!("Total deductions = ${}", round_for_display(total_deductions)),
    });

    // Step 8: net pay, surfaced as-is even when negative
    let net_pay = saturation.sub("net_pay", gross_pay, total_deductions);
    steps.push(AuditStep {
        step_number: 8,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        output: serde_json::json!({ "net_pay": net_pay.to_string() }),
        reasoning: format!(
            "${} - ${} = ${}",
            round_for_display(gross_pay),
            round_for_display(total_deductions),
            round_for_display(net_pay)
        ),
    });

    if base_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_BASE_PAY".to_string(),
            message: format!("Base pay is negative (${})", base_pay.normalize()),
            severity: "high".to_string(),
        });
    }
    if !saturation.steps.is_empty() {
        warnings.push(AuditWarning {
            code: "AMOUNT_OVERFLOW".to_string(),
            message: format!(
                "Figures exceeded the supported range and were capped in: {}",
                saturation.steps.join(", ")
            ),
            severity: "high".to_string(),
        });
    }
    if net_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: format!(
                "Deductions of ${} exceed gross pay of ${}",
                round_for_display(total_deductions),
                round_for_display(gross_pay)
            ),
            severity: "medium".to_string(),
        });
    }

    SalaryCalculation {
        month,
        base_pay,
        incentives,
        daily_rate: daily,
        daily_rate_with_incentives: daily_with_incentives,
        overtime_value,
        gross_pay,
        total_salary_with_incentives,
        absence_deduction,
        penalty_amount,
        total_deductions,
        net_pay,
        audit_trace: AuditTrace { steps, warnings },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn january_2024() -> PayMonth {
        PayMonth::new(2024, 1).unwrap()
    }

    fn example_variables() -> MonthlyVariables {
        MonthlyVariables {
            incentives: None,
            bonuses: dec("200"),
            absence_days: Some(dec("2")),
            penalty_days: dec("1"),
            advances_deducted: dec("500"),
            purchases: dec("300"),
            overtime_hours: dec("10"),
            overtime_rate: dec("20.83"),
            hourly_deductions: Decimal::ZERO,
        }
    }

    #[test]
    fn test_worked_example_in_a_31_day_month() {
        let result = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());
        let shown = result.rounded();

        assert_eq!(shown.daily_rate, dec("166.67"));
        assert_eq!(shown.daily_rate_with_incentives, dec("177.42"));
        assert_eq!(shown.overtime_value, dec("208.30"));
        assert_eq!(shown.gross_pay, dec("5408.30"));
        assert_eq!(shown.absence_deduction, dec("354.84"));
        assert_eq!(shown.penalty_amount, dec("166.67"));
        assert_eq!(shown.total_deductions, dec("1321.51"));
        assert_eq!(shown.net_pay, dec("4086.79"));
        assert_eq!(shown.total_salary_with_incentives, dec("5908.30"));
    }

    #[test]
    fn test_gross_pay_excludes_incentives() {
        let variables = MonthlyVariables::default();
        let result = compute_salary(dec("3000"), dec("400"), &variables, january_2024());

        assert_eq!(result.gross_pay, dec("3000"));
        assert_eq!(result.total_salary_with_incentives, dec("3400"));
        assert_eq!(result.net_pay, dec("3000"));
    }

    #[test]
    fn test_daily_rate_ignores_calendar_length() {
        let february = PayMonth::new(2023, 2).unwrap();
        let result = compute_salary(dec("3000"), Decimal::ZERO, &MonthlyVariables::default(), february);

        assert_eq!(result.daily_rate, dec("100"));
        assert_eq!(result.daily_rate_with_incentives, dec("100"));
    }

    #[test]
    fn test_incentive_rate_uses_calendar_days() {
        let february = PayMonth::new(2023, 2).unwrap();
        let result = compute_salary(dec("2600"), dec("200"), &MonthlyVariables::default(), february);

        assert_eq!(result.daily_rate_with_incentives, dec("100"));
        assert_eq!(result.daily_rate, dec("2600") / dec("30"));
    }

    #[test]
    fn test_absences_without_incentive_use_30_day_rate() {
        let variables = MonthlyVariables {
            absence_days: Some(dec("3")),
            ..Default::default()
        };
        let result = compute_salary(dec("3000"), Decimal::ZERO, &variables, january_2024());

        assert_eq!(result.absence_deduction, dec("300"));
        assert_eq!(result.net_pay, dec("2700"));
    }

    #[test]
    fn test_penalties_use_30_day_rate_even_with_incentive() {
        let variables = MonthlyVariables {
            penalty_days: dec("2"),
            ..Default::default()
        };
        let result = compute_salary(dec("3000"), dec("100"), &variables, january_2024());

        assert_eq!(result.penalty_amount, dec("200"));
    }

    #[test]
    fn test_hourly_deductions_are_included() {
        let variables = MonthlyVariables {
            hourly_deductions: dec("45.50"),
            ..Default::default()
        };
        let result = compute_salary(dec("3000"), Decimal::ZERO, &variables, january_2024());

        assert_eq!(result.total_deductions, dec("45.50"));
        assert_eq!(result.net_pay, dec("2954.50"));
    }

    #[test]
    fn test_unset_absence_days_read_as_zero() {
        let variables = MonthlyVariables {
            absence_days: None,
            ..Default::default()
        };
        let result = compute_salary(dec("3000"), dec("500"), &variables, january_2024());

        assert_eq!(result.absence_deduction, Decimal::ZERO);
    }

    #[test]
    fn test_net_pay_may_go_negative() {
        let variables = MonthlyVariables {
            purchases: dec("4000"),
            ..Default::default()
        };
        let result = compute_salary(dec("3000"), Decimal::ZERO, &variables, january_2024());

        assert_eq!(result.net_pay, dec("-1000"));
        assert!(result.audit_trace.has_warning("NEGATIVE_NET_PAY"));
    }

    #[test]
    fn test_negative_base_pay_propagates() {
        let result = compute_salary(dec("-100"), Decimal::ZERO, &MonthlyVariables::default(), january_2024());

        assert_eq!(result.gross_pay, dec("-100"));
        assert_eq!(result.net_pay, dec("-100"));
        assert!(result.daily_rate < Decimal::ZERO);
        assert!(result.audit_trace.has_warning("NEGATIVE_BASE_PAY"));

        let again = compute_salary(dec("-100"), Decimal::ZERO, &MonthlyVariables::default(), january_2024());
        assert_eq!(result, again);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let first = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());
        let second = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());

        assert_eq!(first, second);
    }

    #[test]
    fn test_audit_trace_records_eight_steps_in_order() {
        let result = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());
        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(
            rule_ids,
            vec![
                "daily_rate",
                "daily_rate_with_incentives",
                "overtime_value",
                "gross_pay",
                "absence_deduction",
                "penalty_amount",
                "total_deductions",
                "net_pay",
            ]
        );
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_overflowing_overtime_saturates_instead_of_panicking() {
        let variables = MonthlyVariables {
            overtime_hours: Decimal::MAX,
            overtime_rate: dec("2"),
            ..Default::default()
        };
        let result = compute_salary(dec("5000"), Decimal::ZERO, &variables, january_2024());

        assert_eq!(result.overtime_value, Decimal::MAX);
        assert_eq!(result.gross_pay, Decimal::MAX);
        assert_eq!(result.net_pay, Decimal::MAX);
        assert!(result.audit_trace.has_warning("AMOUNT_OVERFLOW"));
        let warning = &result.audit_trace.warnings[0];
        assert!(warning.message.contains("overtime_value"));
        assert!(warning.message.contains("gross_pay"));
    }

    #[test]
    fn test_overflowing_deductions_saturate_negative_net() {
        let variables = MonthlyVariables {
            purchases: Decimal::MAX,
            advances_deducted: Decimal::MAX,
            ..Default::default()
        };
        let result = compute_salary(dec("-5000"), Decimal::ZERO, &variables, january_2024());

        assert_eq!(result.total_deductions, Decimal::MAX);
        assert_eq!(result.net_pay, Decimal::MIN);
        assert!(result.audit_trace.has_warning("AMOUNT_OVERFLOW"));
        assert!(result.audit_trace.has_warning("NEGATIVE_NET_PAY"));
        // rounding a saturated figure must not overflow either
        assert_eq!(result.rounded().net_pay, Decimal::MIN);
    }

    #[test]
    fn test_huge_base_pay_with_incentive_saturates_rate() {
        let result = compute_salary(Decimal::MAX, Decimal::MAX, &MonthlyVariables::default(), january_2024());

        assert_eq!(result.daily_rate_with_incentives, Decimal::MAX / dec("31"));
        assert!(result.audit_trace.has_warning("AMOUNT_OVERFLOW"));
    }

    #[test]
    fn test_ordinary_figures_carry_no_overflow_warning() {
        let result = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());
        assert!(!result.audit_trace.has_warning("AMOUNT_OVERFLOW"));
    }

    #[test]
    fn test_audit_reasoning_mentions_calendar_days() {
        let result = compute_salary(dec("5000"), dec("500"), &example_variables(), january_2024());
        let step = result.audit_trace.step("daily_rate_with_incentives").unwrap();

        assert!(step.reasoning.contains("31 days"));
        assert!(step.reasoning.contains("177.42"));
        assert_eq!(step.output["incentive_applied"].as_bool().unwrap(), true);
    }
}
