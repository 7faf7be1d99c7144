//! Payroll engine for small-organisation HR back offices
//!
//! This crate computes monthly salaries, recovers cash advances through
//! payroll deductions (oldest advance first), and keeps employees, salary
//! records, advances and absences behind a pluggable record store. A thin
//! HTTP API exposes the same operations as JSON.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
