//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::calculation::StatusOverridePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::AbsenceKind;

use super::types::{OrganizationConfig, PayrollConfig};

/// The file name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "payroll.yaml";

/// Loads and provides access to the payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── payroll.yaml   # Organisation, advance, absence and server settings
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Payroll for {}", loader.organization().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `payroll.yaml` is missing (`ConfigNotFound`)
    /// - the file contains invalid YAML or misses required fields
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config = Self::load_yaml::<PayrollConfig>(&config_path)?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the organisation metadata.
    pub fn organization(&self) -> &OrganizationConfig {
        &self.config.organization
    }

    /// Returns how manual advance status edits are checked.
    pub fn status_override_policy(&self) -> StatusOverridePolicy {
        self.config.advances.status_override_policy
    }

    /// Returns the absence kinds that reduce salary.
    pub fn deductible_absence_kinds(&self) -> &[AbsenceKind] {
        &self.config.absences.deductible_kinds
    }

    /// Returns the address the HTTP API binds to.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind_address
    }
}
