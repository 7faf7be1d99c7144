//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `payroll.yaml`.

use serde::Deserialize;

use crate::calculation::StatusOverridePolicy;
use crate::models::AbsenceKind;

/// Identifying information about the organisation running payroll.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// The organisation's name.
    pub name: String,
    /// The currency salaries are paid in (e.g., "USD").
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Advance handling settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvanceConfig {
    /// Whether manual status edits may break the paid-iff-settled rule.
    #[serde(default)]
    pub status_override_policy: StatusOverridePolicy,
}

/// Absence handling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AbsenceConfig {
    /// Absence kinds counted towards salary deductions.
    #[serde(default = "all_absence_kinds")]
    pub deductible_kinds: Vec<AbsenceKind>,
}

fn all_absence_kinds() -> Vec<AbsenceKind> {
    vec![
        AbsenceKind::Sick,
        AbsenceKind::Annual,
        AbsenceKind::Unpaid,
        AbsenceKind::Other,
    ]
}

impl Default for AbsenceConfig {
    fn default() -> Self {
        Self {
            deductible_kinds: all_absence_kinds(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// The complete payroll configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Organisation metadata.
    pub organization: OrganizationConfig,
    /// Advance handling.
    #[serde(default)]
    pub advances: AdvanceConfig,
    /// Absence handling.
    #[serde(default)]
    pub absences: AbsenceConfig,
    /// HTTP server.
    #[serde(default)]
    pub server: ServerConfig,
}

impl PayrollConfig {
    /// Creates a configuration with defaults for everything but the
    /// organisation name.
    pub fn with_defaults(organization_name: impl Into<String>) -> Self {
        Self {
            organization: OrganizationConfig {
                name: organization_name.into(),
                currency: default_currency(),
            },
            advances: AdvanceConfig::default(),
            absences: AbsenceConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
