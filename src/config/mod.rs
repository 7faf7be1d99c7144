//! Configuration loading for the payroll engine.
//!
//! This module loads the organisation, advance, absence and server settings
//! from `payroll.yaml`.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Loaded payroll config for: {}", config.organization().name);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{AbsenceConfig, AdvanceConfig, OrganizationConfig, PayrollConfig, ServerConfig};
