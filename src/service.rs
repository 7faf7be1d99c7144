//! Payroll operations over a record store.
//!
//! [`PayrollService`] is the boundary between request handling and the
//! pure calculation core. It looks records up, resolves monthly variables,
//! runs the calculator and the reconciler, and writes the results back.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::calculation::{
    ReconciliationResult, StatusOverrideResult, apply_deduction, compute_salary,
    count_absence_days, override_status,
};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Absence, Advance, AdvanceStatus, Employee, MonthlyVariables, PayMonth, SalaryCalculation,
    SalaryRecord,
};
use crate::store::{RecordStore, Snapshot};

/// The outcome of saving a salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSalary {
    /// The record as stored.
    pub record: SalaryRecord,
    /// The full-precision calculation behind the record.
    pub calculation: SalaryCalculation,
    /// How the advance deduction was spread over pending advances.
    pub reconciliation: ReconciliationResult,
    /// True when no record existed for this employee and month.
    pub created: bool,
}

/// Salary totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The month summarised.
    pub month: PayMonth,
    /// Number of saved salary records.
    pub record_count: usize,
    /// Sum of gross pay.
    pub total_gross: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of net pay.
    pub total_net: Decimal,
}

/// Sums amounts, capping at the `Decimal` bounds.
fn saturating_total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Payroll operations backed by a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct PayrollService<S: RecordStore> {
    store: S,
    config: ConfigLoader,
}

impl<S: RecordStore> PayrollService<S> {
    /// Creates a service over the given store.
    pub fn new(store: S, config: ConfigLoader) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the configuration in effect.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Inserts or replaces an employee after validating it.
    pub fn upsert_employee(&self, employee: Employee) -> EngineResult<Employee> {
        employee.validate()?;
        self.store.put_employee(employee.clone())?;
        info!(employee_id = %employee.id, base_pay = %employee.base_pay, "Employee saved");
        Ok(employee)
    }

    /// Fetches an employee.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no employee has the id.
    pub fn employee(&self, id: &str) -> EngineResult<Employee> {
        self.store
            .employee(id)?
            .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })
    }

    /// Lists all employees.
    pub fn employees(&self) -> EngineResult<Vec<Employee>> {
        self.store.employees()
    }

    /// Deletes an employee.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no employee has the id, or
    /// `EmployeeInUse` while salary records or advances still reference it.
    pub fn delete_employee(&self, id: &str) -> EngineResult<()> {
        self.employee(id)?;

        let references =
            self.store.salary_records_for(id)?.len() + self.store.advances_for(id)?.len();
        if references > 0 {
            warn!(employee_id = %id, references, "Refusing to delete referenced employee");
            return Err(EngineError::EmployeeInUse {
                id: id.to_string(),
                references,
            });
        }

        self.store.delete_employee(id)?;
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    /// Fills unset monthly variables from the employee and their absences.
    ///
    /// Unset incentives fall back to the employee's monthly incentive;
    /// unset absence days are counted from approved absences of the
    /// configured kinds.
    pub fn resolve_variables(
        &self,
        employee: &Employee,
        month: PayMonth,
        variables: MonthlyVariables,
    ) -> EngineResult<MonthlyVariables> {
        let counted = if variables.absence_days.is_none() {
            let absences = self.store.absences_for(&employee.id)?;
            count_absence_days(
                &absences,
                &employee.id,
                month,
                self.config.deductible_absence_kinds(),
            )
        } else {
            Decimal::ZERO
        };
        Ok(variables.resolve(employee.monthly_incentive, counted))
    }

    /// Computes an employee's salary for a month without saving anything.
    pub fn calculate_salary(
        &self,
        employee_id: &str,
        month: PayMonth,
        variables: MonthlyVariables,
    ) -> EngineResult<SalaryCalculation> {
        let employee = self.employee(employee_id)?;
        let resolved = self.resolve_variables(&employee, month, variables)?;
        let calculation = compute_salary(
            employee.base_pay,
            resolved.incentives_or_zero(),
            &resolved,
            month,
        );
        debug!(
            employee_id = %employee_id,
            month = %month,
            net_pay = %calculation.net_pay,
            "Salary calculated"
        );
        Ok(calculation)
    }

    /// Computes and saves an employee's salary for a month, then applies
    /// the advance deduction to their pending advances.
    ///
    /// There is one record per employee and month; saving again replaces
    /// it. Only the increase in `advances_deducted` over the previously
    /// saved record is applied to advances, so saving the same figures
    /// twice leaves advance balances untouched.
    ///
    /// Advances are written before the record. If the advance write fails
    /// nothing is stored; if the record write fails the advances are put
    /// back. Either way a retry applies the same delta again.
    pub fn save_salary(
        &self,
        employee_id: &str,
        month: PayMonth,
        variables: MonthlyVariables,
        today: NaiveDate,
    ) -> EngineResult<SavedSalary> {
        let employee = self.employee(employee_id)?;
        let resolved = self.resolve_variables(&employee, month, variables)?;
        let calculation = compute_salary(
            employee.base_pay,
            resolved.incentives_or_zero(),
            &resolved,
            month,
        );

        let now = Utc::now();
        let mut record = SalaryRecord::from_calculation(employee_id, resolved, &calculation, now);
        let previous = self.store.salary_record(&record.id)?;

        let already_deducted = previous
            .as_ref()
            .map(|p| p.variables.advances_deducted)
            .unwrap_or(Decimal::ZERO);
        let delta = record
            .variables
            .advances_deducted
            .saturating_sub(already_deducted);
        let to_apply = if delta < Decimal::ZERO {
            warn!(
                employee_id = %employee_id,
                month = %month,
                previous = %already_deducted,
                requested = %record.variables.advances_deducted,
                "Advance deduction lowered on re-save; repaid balances are not restored"
            );
            Decimal::ZERO
        } else {
            delta
        };

        if let Some(previous) = &previous {
            record.created_at = previous.created_at;
        }

        let pending = self.store.pending_advances(employee_id)?;
        let reconciliation = apply_deduction(&pending, to_apply, today);
        let changed = reconciliation.changed_advances();
        if !changed.is_empty() {
            self.store.save_advances(&changed)?;
        }
        if let Err(err) = self.store.save_salary_record(record.clone()) {
            self.roll_back_payoffs(employee_id, &pending, &changed);
            return Err(err);
        }
        if reconciliation.unapplied > Decimal::ZERO {
            warn!(
                employee_id = %employee_id,
                unapplied = %reconciliation.unapplied,
                "Advance deduction exceeds outstanding balance"
            );
        }

        info!(
            employee_id = %employee_id,
            month = %month,
            net_pay = %record.net_pay,
            advance_payoffs = reconciliation.payoffs.len(),
            created = previous.is_none(),
            "Salary saved"
        );

        Ok(SavedSalary {
            record,
            calculation,
            reconciliation,
            created: previous.is_none(),
        })
    }

    /// Restores the pre-payoff state of advances a failed save touched.
    fn roll_back_payoffs(&self, employee_id: &str, pending: &[Advance], changed: &[Advance]) {
        let originals: Vec<Advance> = pending
            .iter()
            .filter(|a| changed.iter().any(|c| c.id == a.id))
            .cloned()
            .collect();
        if originals.is_empty() {
            return;
        }
        match self.store.save_advances(&originals) {
            Ok(()) => warn!(
                employee_id = %employee_id,
                advances = originals.len(),
                "Salary record not saved; advance payoffs rolled back"
            ),
            Err(err) => error!(
                employee_id = %employee_id,
                advances = originals.len(),
                error = %err,
                "Salary record not saved and advance payoffs could not be rolled back"
            ),
        }
    }

    /// Fetches the saved salary record for an employee and month, if any.
    pub fn salary_record(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Option<SalaryRecord>> {
        self.store
            .salary_record(&SalaryRecord::record_id(employee_id, month))
    }

    /// Totals the saved salary records for a month.
    pub fn monthly_summary(&self, month: PayMonth) -> EngineResult<MonthlySummary> {
        let records = self.store.salary_records_for_month(month)?;
        Ok(MonthlySummary {
            month,
            record_count: records.len(),
            total_gross: saturating_total(records.iter().map(|r| r.gross_pay)),
            total_deductions: saturating_total(records.iter().map(|r| r.total_deductions)),
            total_net: saturating_total(records.iter().map(|r| r.net_pay)),
        })
    }

    /// Records a new pending advance for an employee.
    pub fn request_advance(
        &self,
        employee_id: &str,
        amount: Decimal,
        request_date: NaiveDate,
        expected_repayment_date: NaiveDate,
        reason: Option<String>,
    ) -> EngineResult<Advance> {
        self.employee(employee_id)?;

        let id = format!("adv_{}", Uuid::new_v4().simple());
        let mut advance = Advance::new(
            id,
            employee_id,
            amount,
            request_date,
            expected_repayment_date,
        )?;
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            advance = advance.with_reason(reason);
        }

        self.store.save_advances(std::slice::from_ref(&advance))?;
        info!(
            employee_id = %employee_id,
            advance_id = %advance.id,
            amount = %advance.amount,
            "Advance requested"
        );
        Ok(advance)
    }

    /// Lists an employee's pending advances, oldest request first.
    pub fn pending_advances(&self, employee_id: &str) -> EngineResult<Vec<Advance>> {
        self.employee(employee_id)?;
        self.store.pending_advances(employee_id)
    }

    /// Sum of the balances still owed on an employee's unpaid advances.
    pub fn outstanding_balance(&self, employee_id: &str) -> EngineResult<Decimal> {
        Ok(saturating_total(
            self.store
                .advances_for(employee_id)?
                .iter()
                .filter(|a| a.status != AdvanceStatus::Paid)
                .map(|a| a.remaining_amount),
        ))
    }

    /// Sets an advance's status by hand under the configured policy.
    pub fn override_advance_status(
        &self,
        advance_id: &str,
        status: AdvanceStatus,
        today: NaiveDate,
    ) -> EngineResult<StatusOverrideResult> {
        let advance = self
            .store
            .advance(advance_id)?
            .ok_or_else(|| EngineError::AdvanceNotFound {
                id: advance_id.to_string(),
            })?;

        let result = override_status(
            &advance,
            status,
            today,
            self.config.status_override_policy(),
        )?;
        self.store
            .save_advances(std::slice::from_ref(&result.advance))?;

        if let Some(warning) = &result.warning {
            warn!(advance_id = %advance_id, code = %warning.code, "{}", warning.message);
        }
        info!(
            advance_id = %advance_id,
            from = %advance.status,
            to = %status,
            "Advance status overridden"
        );
        Ok(result)
    }

    /// Deletes an advance.
    pub fn delete_advance(&self, advance_id: &str) -> EngineResult<()> {
        if !self.store.delete_advance(advance_id)? {
            return Err(EngineError::AdvanceNotFound {
                id: advance_id.to_string(),
            });
        }
        info!(advance_id = %advance_id, "Advance deleted");
        Ok(())
    }

    /// Records an absence for an existing employee.
    pub fn record_absence(&self, absence: Absence) -> EngineResult<Absence> {
        absence.validate()?;
        self.employee(&absence.employee_id)?;
        self.store.put_absence(absence.clone())?;
        info!(
            employee_id = %absence.employee_id,
            absence_id = %absence.id,
            kind = ?absence.kind,
            days = absence.total_days(),
            "Absence recorded"
        );
        Ok(absence)
    }

    /// Lists an employee's absences.
    pub fn absences_for(&self, employee_id: &str) -> EngineResult<Vec<Absence>> {
        self.store.absences_for(employee_id)
    }

    /// Deletes an absence, returning whether it existed.
    pub fn delete_absence(&self, absence_id: &str) -> EngineResult<bool> {
        let removed = self.store.delete_absence(absence_id)?;
        if removed {
            info!(absence_id = %absence_id, "Absence deleted");
        }
        Ok(removed)
    }

    /// Exports every record.
    pub fn backup(&self) -> EngineResult<Snapshot> {
        let snapshot = self.store.snapshot()?;
        info!(records = snapshot.record_count(), "Backup exported");
        Ok(snapshot)
    }

    /// Replaces every record with a snapshot's contents, returning the
    /// number of records restored.
    pub fn restore(&self, snapshot: Snapshot) -> EngineResult<usize> {
        let count = snapshot.record_count();
        self.store.restore(snapshot)?;
        info!(records = count, "Backup restored");
        Ok(count)
    }
}
