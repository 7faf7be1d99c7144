//! Employee model.
//!
//! This module defines the Employee struct holding the pay figures the
//! salary calculation starts from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// Base monthly pay.
    pub base_pay: Decimal,
    /// Monthly incentive paid on top of base pay (defaults to zero).
    #[serde(default)]
    pub monthly_incentive: Decimal,
    /// The date the employee joined.
    pub join_date: NaiveDate,
    /// Optional job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Employee {
    /// Returns true if the employee receives a monthly incentive.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Sara Haddad".to_string(),
    ///     base_pay: Decimal::new(5000, 0),
    ///     monthly_incentive: Decimal::new(500, 0),
    ///     join_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
    ///     position: None,
    /// };
    /// assert!(employee.has_incentive());
    /// ```
    pub fn has_incentive(&self) -> bool {
        self.monthly_incentive > Decimal::ZERO
    }

    /// Checks the fields a form submission can get wrong.
    ///
    /// The id and name must be non-blank and both pay figures non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidEmployee {
                field: "id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidEmployee {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.base_pay < Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                field: "base_pay".to_string(),
                message: format!("must not be negative, got {}", self.base_pay),
            });
        }
        if self.monthly_incentive < Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                field: "monthly_incentive".to_string(),
                message: format!("must not be negative, got {}", self.monthly_incentive),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Sara Haddad".to_string(),
            base_pay: dec("5000"),
            monthly_incentive: Decimal::ZERO,
            join_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            position: Some("Accountant".to_string()),
        }
    }

    #[test]
    fn test_deserialize_employee_with_string_amounts() {
        let json = r#"{
            "id": "emp_002",
            "name": "Omar Nasser",
            "base_pay": "4200.50",
            "monthly_incentive": "300",
            "join_date": "2023-01-15"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_002");
        assert_eq!(employee.base_pay, dec("4200.50"));
        assert_eq!(employee.monthly_incentive, dec("300"));
        assert_eq!(
            employee.join_date,
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
        );
        assert!(employee.position.is_none());
    }

    #[test]
    fn test_monthly_incentive_defaults_to_zero() {
        let json = r#"{
            "id": "emp_003",
            "name": "Lina Farah",
            "base_pay": 3000,
            "join_date": "2024-06-01"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.monthly_incentive, Decimal::ZERO);
        assert!(!employee.has_incentive());
    }

    #[test]
    fn test_position_omitted_when_absent() {
        let mut employee = create_test_employee();
        employee.position = None;

        let json = serde_json::to_string(&employee).unwrap();
        assert!(!json.contains("position"));
    }

    #[test]
    fn test_validate_accepts_well_formed_employee() {
        assert!(create_test_employee().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut employee = create_test_employee();
        employee.name = "   ".to_string();

        match employee.validate() {
            Err(EngineError::InvalidEmployee { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_base_pay() {
        let mut employee = create_test_employee();
        employee.base_pay = dec("-100");

        match employee.validate() {
            Err(EngineError::InvalidEmployee { field, message }) => {
                assert_eq!(field, "base_pay");
                assert!(message.contains("-100"));
            }
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_incentive() {
        let mut employee = create_test_employee();
        employee.monthly_incentive = dec("-1");

        assert!(employee.validate().is_err());
    }
}
