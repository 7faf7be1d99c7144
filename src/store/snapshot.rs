//! Backup snapshots of the full record set.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Absence, Advance, Employee, SalaryRecord};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Every record the store holds, as exported for backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version; restores reject anything newer.
    pub version: u32,
    /// When the snapshot was taken.
    pub exported_at: DateTime<Utc>,
    /// All employees.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// All salary records.
    #[serde(default)]
    pub salary_records: Vec<SalaryRecord>,
    /// All advances.
    #[serde(default)]
    pub advances: Vec<Advance>,
    /// All absences.
    #[serde(default)]
    pub absences: Vec<Absence>,
}

impl Snapshot {
    /// Creates an empty snapshot stamped with the given time.
    pub fn empty(exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at,
            employees: Vec::new(),
            salary_records: Vec::new(),
            advances: Vec::new(),
            absences: Vec::new(),
        }
    }

    /// Encodes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::SnapshotError {
            message: e.to_string(),
        })
    }

    /// Decodes and validates a JSON snapshot.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| EngineError::SnapshotError {
                message: e.to_string(),
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads and validates a snapshot file.
    ///
    /// Returns `None` when the file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::SnapshotError {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json).map(Some)
    }

    /// Writes the snapshot to a file as JSON, replacing any previous one.
    pub fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| EngineError::SnapshotError {
            message: format!("failed to write {}: {}", path.display(), e),
        })
    }

    /// Checks the version, that ids are unique within each table, and
    /// every record's own constraints.
    pub fn validate(&self) -> EngineResult<()> {
        if self.version > SNAPSHOT_VERSION {
            return Err(EngineError::SnapshotError {
                message: format!(
                    "snapshot version {} is newer than supported version {}",
                    self.version, SNAPSHOT_VERSION
                ),
            });
        }
        reject_duplicate_ids("employee", self.employees.iter().map(|e| e.id.as_str()))?;
        reject_duplicate_ids("salary record", self.salary_records.iter().map(|r| r.id.as_str()))?;
        reject_duplicate_ids("advance", self.advances.iter().map(|a| a.id.as_str()))?;
        reject_duplicate_ids("absence", self.absences.iter().map(|a| a.id.as_str()))?;

        for employee in &self.employees {
            employee.validate()?;
        }
        for advance in &self.advances {
            advance.validate()?;
        }
        for absence in &self.absences {
            absence.validate()?;
        }
        if let Some(record) = self.salary_records.iter().find(|r| !r.is_balanced()) {
            return Err(EngineError::SnapshotError {
                message: format!(
                    "salary record {} has net pay {} but gross {} minus deductions {}",
                    record.id, record.net_pay, record.gross_pay, record.total_deductions
                ),
            });
        }
        Ok(())
    }

    /// Total number of records across all tables.
    pub fn record_count(&self) -> usize {
        self.employees.len() + self.salary_records.len() + self.advances.len() + self.absences.len()
    }
}

fn reject_duplicate_ids<'a>(table: &str, ids: impl Iterator<Item = &'a str>) -> EngineResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::SnapshotError {
                message: format!("duplicate {} id {}", table, id),
            });
        }
    }
    Ok(())
}
