//! Advance repayment through payroll deductions.
//!
//! When a salary is saved with an `advances_deducted` amount, that amount
//! is spread over the employee's pending advances, oldest request first,
//! paying each off in full before moving to the next.
//!
//! Status transitions driven here are `pending -> pending` (partial
//! payoff) and `pending -> paid` (balance reaches zero). Everything else,
//! including `pending -> delayed` and any move back out of `paid`, only
//! happens through [`override_status`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Advance, AdvanceStatus, AuditStep, AuditTrace, AuditWarning};

/// One advance's share of a deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePayoff {
    /// The advance the payoff went to.
    pub advance_id: String,
    /// The amount applied to it.
    pub amount: Decimal,
    /// Its balance after the payoff.
    pub remaining_amount: Decimal,
    /// Whether the payoff settled it.
    pub settled: bool,
}

/// The outcome of applying a deduction to a set of advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Every advance passed in, in input order, with updated balances.
    pub advances: Vec<Advance>,
    /// Payoffs in the order they were applied.
    pub payoffs: Vec<AdvancePayoff>,
    /// Total applied across all advances.
    pub applied: Decimal,
    /// Deduction left over once every pending balance was cleared.
    pub unapplied: Decimal,
    /// Audit trace of the payoffs.
    pub audit_trace: AuditTrace,
}

impl ReconciliationResult {
    /// Returns the advances that received a payoff.
    pub fn changed_advances(&self) -> Vec<Advance> {
        self.advances
            .iter()
            .filter(|a| self.payoffs.iter().any(|p| p.advance_id == a.id))
            .cloned()
            .collect()
    }
}

/// Applies a payroll deduction to an employee's advances.
///
/// Only `pending` advances participate; they are walked in ascending
/// `request_date` order whatever order they were passed in (ties keep
/// input order). Each receives `min(remaining deduction, its balance)`.
/// An advance whose balance reaches exactly zero becomes `paid` with
/// `actual_repayment_date = today`.
///
/// A negative deduction is treated as zero. If the deduction exceeds the
/// total pending balance, the excess is left unapplied and reported with a
/// `DEDUCTION_EXCEEDS_BALANCE` warning.
///
/// The function works on a copy of its input and keeps no state, so
/// calling it twice with the same deduction applies it twice; callers
/// invoke it once per salary save.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::apply_deduction;
/// use payroll_engine::models::{Advance, AdvanceStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
/// let later = Advance::new("adv_b", "emp_001", Decimal::new(800, 0), date(10), date(31)).unwrap();
/// let older = Advance::new("adv_a", "emp_001", Decimal::new(1000, 0), date(1), date(31)).unwrap();
///
/// let result = apply_deduction(&[later, older], Decimal::new(1200, 0), date(31));
///
/// assert_eq!(result.advances[1].remaining_amount, Decimal::ZERO);
/// assert_eq!(result.advances[1].status, AdvanceStatus::Paid);
/// assert_eq!(result.advances[0].remaining_amount, Decimal::new(600, 0));
/// assert_eq!(result.advances[0].status, AdvanceStatus::Pending);
/// ```
pub fn apply_deduction(
    advances: &[Advance],
    deduction: Decimal,
    today: NaiveDate,
) -> ReconciliationResult {
    let mut updated = advances.to_vec();
    let mut payoffs: Vec<AdvancePayoff> = Vec::new();
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    if deduction < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_DEDUCTION".to_string(),
            message: format!("Deduction of ${} treated as zero", deduction.normalize()),
            severity: "low".to_string(),
        });
    }
    let requested = deduction.max(Decimal::ZERO);
    let mut remaining_to_apply = requested;

    let mut order: Vec<usize> = (0..updated.len())
        .filter(|&i| updated[i].is_pending() && updated[i].remaining_amount > Decimal::ZERO)
        .collect();
    order.sort_by_key(|&i| updated[i].request_date);

    for index in order {
        if remaining_to_apply <= Decimal::ZERO {
            break;
        }

        let advance = &mut updated[index];
        let balance_before = advance.remaining_amount;
        let payoff = remaining_to_apply.min(balance_before);

        advance.remaining_amount -= payoff;
        remaining_to_apply -= payoff;

        let settled = advance.remaining_amount.is_zero();
        if settled {
            advance.status = AdvanceStatus::Paid;
            advance.actual_repayment_date = Some(today);
        }

        steps.push(AuditStep {
            step_number: steps.len() as u32 + 1,
            rule_id: "advance_payoff".to_string(),
            rule_name: "Advance Payoff".to_string(),
            input: serde_json::json!({
                "advance_id": advance.id,
                "request_date": advance.request_date.to_string(),
                "remaining_before": balance_before.to_string(),
                "deduction_available": (remaining_to_apply + payoff).to_string()
            }),
            output: serde_json::json!({
                "payoff": payoff.to_string(),
                "remaining_after": advance.remaining_amount.to_string(),
                "status": advance.status
            }),
            reasoning: if settled {
                format!(
                    "Advance {} requested {} settled with ${}",
                    advance.id,
                    advance.request_date,
                    payoff.normalize()
                )
            } else {
                format!(
                    "Applied ${} to advance {} requested {}; ${} still outstanding",
                    payoff.normalize(),
                    advance.id,
                    advance.request_date,
                    advance.remaining_amount.normalize()
                )
            },
        });

        payoffs.push(AdvancePayoff {
            advance_id: advance.id.clone(),
            amount: payoff,
            remaining_amount: advance.remaining_amount,
            settled,
        });
    }

    if remaining_to_apply > Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "DEDUCTION_EXCEEDS_BALANCE".to_string(),
            message: format!(
                "${} of the ${} deduction had no pending advance to apply to",
                remaining_to_apply.normalize(),
                requested.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    ReconciliationResult {
        advances: updated,
        payoffs,
        applied: requested - remaining_to_apply,
        unapplied: remaining_to_apply,
        audit_trace: AuditTrace { steps, warnings },
    }
}

/// How manual status edits treat the paid-iff-settled rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusOverridePolicy {
    /// Reject edits that would leave status and balance disagreeing.
    #[default]
    Strict,
    /// Apply any edit and report the disagreement as a warning.
    Lenient,
}

/// The outcome of a manual status edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverrideResult {
    /// The advance with its new status.
    pub advance: Advance,
    /// Set when a lenient edit left status and balance disagreeing.
    pub warning: Option<AuditWarning>,
}

/// Sets an advance's status by hand, outside the reconciler.
///
/// This is the escape hatch for transitions no payroll rule drives, such
/// as `pending -> delayed` or moving an advance back to `pending`. Under
/// [`StatusOverridePolicy::Strict`] the edit must keep `paid` exactly when
/// the balance is zero; under [`StatusOverridePolicy::Lenient`] anything
/// goes. Marking an advance `paid` stamps `actual_repayment_date` with
/// `today` if it was unset; moving it out of `paid` clears the date.
///
/// # Errors
///
/// Returns `InconsistentAdvanceStatus` under the strict policy when the
/// requested status disagrees with the balance.
pub fn override_status(
    advance: &Advance,
    status: AdvanceStatus,
    today: NaiveDate,
    policy: StatusOverridePolicy,
) -> EngineResult<StatusOverrideResult> {
    let consistent = (status == AdvanceStatus::Paid) == advance.is_settled();

    if !consistent && policy == StatusOverridePolicy::Strict {
        return Err(EngineError::InconsistentAdvanceStatus {
            advance_id: advance.id.clone(),
            status,
            remaining_amount: advance.remaining_amount,
        });
    }

    let mut updated = advance.clone();
    updated.status = status;
    if status == AdvanceStatus::Paid {
        updated.actual_repayment_date.get_or_insert(today);
    } else {
        updated.actual_repayment_date = None;
    }

    let warning = (!consistent).then(|| AuditWarning {
        code: "INCONSISTENT_ADVANCE_STATUS".to_string(),
        message: format!(
            "Advance {} marked {} with ${} remaining",
            updated.id,
            status,
            updated.remaining_amount.normalize()
        ),
        severity: "high".to_string(),
    });

    Ok(StatusOverrideResult {
        advance: updated,
        warning,
    })
}
