//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::{EngineError, EngineResult};
use crate::models::{Absence, Advance, Employee, PayMonth, SalaryRecord};

use super::{RecordStore, Snapshot};

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<String, Employee>,
    salary_records: BTreeMap<String, SalaryRecord>,
    advances: BTreeMap<String, Advance>,
    absences: BTreeMap<String, Absence>,
}

/// In-memory record store.
///
/// Clones share the same tables. Writes are last-write-wins; listings come
/// back sorted by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded from a snapshot, as the server does on
    /// startup when a data file exists.
    pub fn from_snapshot(snapshot: Snapshot) -> EngineResult<Self> {
        let store = Self::new();
        store.restore(snapshot)?;
        Ok(store)
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| EngineError::StoreUnavailable {
            message: "record store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| EngineError::StoreUnavailable {
            message: "record store lock poisoned".to_string(),
        })
    }
}

impl RecordStore for MemoryStore {
    fn employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.read()?.employees.get(id).cloned())
    }

    fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.read()?.employees.values().cloned().collect())
    }

    fn put_employee(&self, employee: Employee) -> EngineResult<()> {
        self.write()?.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn delete_employee(&self, id: &str) -> EngineResult<bool> {
        Ok(self.write()?.employees.remove(id).is_some())
    }

    fn advance(&self, id: &str) -> EngineResult<Option<Advance>> {
        Ok(self.read()?.advances.get(id).cloned())
    }

    fn advances_for(&self, employee_id: &str) -> EngineResult<Vec<Advance>> {
        Ok(self
            .read()?
            .advances
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn save_advances(&self, advances: &[Advance]) -> EngineResult<()> {
        let mut tables = self.write()?;
        for advance in advances {
            tables.advances.insert(advance.id.clone(), advance.clone());
        }
        Ok(())
    }

    fn delete_advance(&self, id: &str) -> EngineResult<bool> {
        Ok(self.write()?.advances.remove(id).is_some())
    }

    fn salary_record(&self, id: &str) -> EngineResult<Option<SalaryRecord>> {
        Ok(self.read()?.salary_records.get(id).cloned())
    }

    fn salary_records_for(&self, employee_id: &str) -> EngineResult<Vec<SalaryRecord>> {
        Ok(self
            .read()?
            .salary_records
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn salary_records_for_month(&self, month: PayMonth) -> EngineResult<Vec<SalaryRecord>> {
        Ok(self
            .read()?
            .salary_records
            .values()
            .filter(|r| r.month == month)
            .cloned()
            .collect())
    }

    fn save_salary_record(&self, record: SalaryRecord) -> EngineResult<()> {
        self.write()?.salary_records.insert(record.id.clone(), record);
        Ok(())
    }

    fn absences_for(&self, employee_id: &str) -> EngineResult<Vec<Absence>> {
        Ok(self
            .read()?
            .absences
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn put_absence(&self, absence: Absence) -> EngineResult<()> {
        self.write()?.absences.insert(absence.id.clone(), absence);
        Ok(())
    }

    fn delete_absence(&self, id: &str) -> EngineResult<bool> {
        Ok(self.write()?.absences.remove(id).is_some())
    }

    fn snapshot(&self) -> EngineResult<Snapshot> {
        let tables = self.read()?;
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.employees = tables.employees.values().cloned().collect();
        snapshot.salary_records = tables.salary_records.values().cloned().collect();
        snapshot.advances = tables.advances.values().cloned().collect();
        snapshot.absences = tables.absences.values().cloned().collect();
        Ok(snapshot)
    }

    fn restore(&self, snapshot: Snapshot) -> EngineResult<()> {
        snapshot.validate()?;

        let restored = Tables {
            employees: snapshot
                .employees
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            salary_records: snapshot
                .salary_records
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            advances: snapshot
                .advances
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            absences: snapshot
                .absences
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
        };
        *self.write()? = restored;
        Ok(())
    }
}
