//! Record persistence for the payroll engine.
//!
//! The calculation core never touches storage. Everything it reads and
//! writes goes through the [`RecordStore`] trait, so backends can be
//! swapped without touching payroll logic:
//! - [`MemoryStore`]: in-memory tables, used by the server and in tests
//!
//! The store owns write ordering; last write wins.

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};

use crate::error::EngineResult;
use crate::models::{Absence, Advance, Employee, PayMonth, SalaryRecord};

/// Typed get/set/list/delete access to each record type.
///
/// All writes are upserts keyed by the record's id.
pub trait RecordStore: Send + Sync {
    /// Looks up an employee.
    fn employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Lists all employees.
    fn employees(&self) -> EngineResult<Vec<Employee>>;

    /// Inserts or replaces an employee.
    fn put_employee(&self, employee: Employee) -> EngineResult<()>;

    /// Removes an employee, returning whether it existed.
    fn delete_employee(&self, id: &str) -> EngineResult<bool>;

    /// Looks up an advance.
    fn advance(&self, id: &str) -> EngineResult<Option<Advance>>;

    /// Lists every advance for an employee, whatever its status.
    fn advances_for(&self, employee_id: &str) -> EngineResult<Vec<Advance>>;

    /// Inserts or replaces each advance by id.
    fn save_advances(&self, advances: &[Advance]) -> EngineResult<()>;

    /// Removes an advance, returning whether it existed.
    fn delete_advance(&self, id: &str) -> EngineResult<bool>;

    /// Lists an employee's pending advances, oldest request first.
    fn pending_advances(&self, employee_id: &str) -> EngineResult<Vec<Advance>> {
        let mut pending: Vec<Advance> = self
            .advances_for(employee_id)?
            .into_iter()
            .filter(Advance::is_pending)
            .collect();
        pending.sort_by_key(|a| a.request_date);
        Ok(pending)
    }

    /// Looks up a salary record.
    fn salary_record(&self, id: &str) -> EngineResult<Option<SalaryRecord>>;

    /// Lists every salary record for an employee.
    fn salary_records_for(&self, employee_id: &str) -> EngineResult<Vec<SalaryRecord>>;

    /// Lists every salary record for a month.
    fn salary_records_for_month(&self, month: PayMonth) -> EngineResult<Vec<SalaryRecord>>;

    /// Inserts or replaces a salary record by id.
    fn save_salary_record(&self, record: SalaryRecord) -> EngineResult<()>;

    /// Lists every absence for an employee.
    fn absences_for(&self, employee_id: &str) -> EngineResult<Vec<Absence>>;

    /// Inserts or replaces an absence.
    fn put_absence(&self, absence: Absence) -> EngineResult<()>;

    /// Removes an absence, returning whether it existed.
    fn delete_absence(&self, id: &str) -> EngineResult<bool>;

    /// Exports every record.
    fn snapshot(&self) -> EngineResult<Snapshot>;

    /// Replaces every record with the snapshot's contents.
    ///
    /// The snapshot is validated first; an invalid one leaves the store
    /// untouched.
    fn restore(&self, snapshot: Snapshot) -> EngineResult<()>;
}
