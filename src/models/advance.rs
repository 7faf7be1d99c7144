//! Cash advance model.
//!
//! An advance is paid out up front and recovered through payroll
//! deductions. Its balance only moves through the advance reconciler; the
//! status can additionally be edited by hand (see
//! [`override_status`](crate::calculation::override_status)).

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Repayment status of an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Outstanding, participates in payroll deductions.
    Pending,
    /// Fully repaid.
    Paid,
    /// Repayment postponed by hand; excluded from deductions.
    Delayed,
}

impl fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvanceStatus::Pending => "pending",
            AdvanceStatus::Paid => "paid",
            AdvanceStatus::Delayed => "delayed",
        };
        f.write_str(name)
    }
}

/// A cash advance given to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// Unique identifier for the advance.
    pub id: String,
    /// The employee the advance was paid to.
    pub employee_id: String,
    /// The principal paid out.
    pub amount: Decimal,
    /// The balance still to be recovered.
    pub remaining_amount: Decimal,
    /// When the advance was requested. Deductions settle the oldest first.
    pub request_date: NaiveDate,
    /// When repayment is expected to complete.
    pub expected_repayment_date: NaiveDate,
    /// When the balance reached zero.
    #[serde(default)]
    pub actual_repayment_date: Option<NaiveDate>,
    /// Repayment status.
    pub status: AdvanceStatus,
    /// Free-text reason given with the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Advance {
    /// Creates a new pending advance with its full amount outstanding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAdvance` if the amount is not positive or the
    /// expected repayment date precedes the request date.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Advance, AdvanceStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let advance = Advance::new(
    ///     "adv_001",
    ///     "emp_001",
    ///     Decimal::new(1000, 0),
    ///     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(advance.status, AdvanceStatus::Pending);
    /// assert_eq!(advance.remaining_amount, Decimal::new(1000, 0));
    /// ```
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        amount: Decimal,
        request_date: NaiveDate,
        expected_repayment_date: NaiveDate,
    ) -> EngineResult<Self> {
        let advance = Self {
            id: id.into(),
            employee_id: employee_id.into(),
            amount,
            remaining_amount: amount,
            request_date,
            expected_repayment_date,
            actual_repayment_date: None,
            status: AdvanceStatus::Pending,
            reason: None,
        };
        advance.validate()?;
        Ok(advance)
    }

    /// Attaches a reason to the advance.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Checks the amount, balance and date constraints.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidAdvance {
            advance_id: self.id.clone(),
            message,
        };

        if self.amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.remaining_amount < Decimal::ZERO || self.remaining_amount > self.amount {
            return Err(invalid(format!(
                "remaining amount {} must be between 0 and {}",
                self.remaining_amount, self.amount
            )));
        }
        if self.expected_repayment_date < self.request_date {
            return Err(invalid(format!(
                "expected repayment date {} precedes request date {}",
                self.expected_repayment_date, self.request_date
            )));
        }
        Ok(())
    }

    /// Returns true if the advance participates in payroll deductions.
    pub fn is_pending(&self) -> bool {
        self.status == AdvanceStatus::Pending
    }

    /// Returns true if nothing remains to be recovered.
    pub fn is_settled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    /// The amount recovered so far.
    pub fn repaid_amount(&self) -> Decimal {
        self.amount - self.remaining_amount
    }

    /// Returns true if the status agrees with the balance: paid exactly
    /// when settled.
    pub fn is_consistent(&self) -> bool {
        (self.status == AdvanceStatus::Paid) == self.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_advance() -> Advance {
        Advance::new("adv_001", "emp_001", dec("1000"), date(2024, 5, 1), date(2024, 8, 1))
            .unwrap()
    }

    #[test]
    fn test_new_advance_is_pending_with_full_balance() {
        let advance = create_test_advance();

        assert_eq!(advance.status, AdvanceStatus::Pending);
        assert_eq!(advance.remaining_amount, dec("1000"));
        assert!(advance.actual_repayment_date.is_none());
        assert!(advance.is_consistent());
        assert_eq!(advance.repaid_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let result = Advance::new("adv_002", "emp_001", dec("0"), date(2024, 5, 1), date(2024, 6, 1));

        match result {
            Err(EngineError::InvalidAdvance { advance_id, message }) => {
                assert_eq!(advance_id, "adv_002");
                assert!(message.contains("positive"));
            }
            other => panic!("Expected InvalidAdvance, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let result =
            Advance::new("adv_003", "emp_001", dec("-50"), date(2024, 5, 1), date(2024, 6, 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_repayment_date_before_request_is_rejected() {
        let result =
            Advance::new("adv_004", "emp_001", dec("100"), date(2024, 5, 1), date(2024, 4, 1));

        match result {
            Err(EngineError::InvalidAdvance { message, .. }) => {
                assert!(message.contains("precedes"));
            }
            other => panic!("Expected InvalidAdvance, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_balance_above_principal() {
        let mut advance = create_test_advance();
        advance.remaining_amount = dec("1000.01");
        assert!(advance.validate().is_err());
    }

    #[test]
    fn test_paid_with_balance_is_inconsistent() {
        let mut advance = create_test_advance();
        advance.status = AdvanceStatus::Paid;
        assert!(!advance.is_consistent());

        advance.remaining_amount = Decimal::ZERO;
        assert!(advance.is_consistent());
    }

    #[test]
    fn test_settled_pending_is_inconsistent() {
        let mut advance = create_test_advance();
        advance.remaining_amount = Decimal::ZERO;
        assert!(advance.is_settled());
        assert!(!advance.is_consistent());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AdvanceStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&AdvanceStatus::Delayed).unwrap(),
            "\"delayed\""
        );
        let status: AdvanceStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, AdvanceStatus::Paid);
    }

    #[test]
    fn test_status_display_matches_serialized_name() {
        assert_eq!(AdvanceStatus::Paid.to_string(), "paid");
        assert_eq!(AdvanceStatus::Delayed.to_string(), "delayed");
    }

    #[test]
    fn test_with_reason() {
        let advance = create_test_advance().with_reason("Medical bill");
        assert_eq!(advance.reason.as_deref(), Some("Medical bill"));
    }
}
