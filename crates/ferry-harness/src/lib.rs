//! Conformance harness for the ferry value bridge.
//!
//! Drives one scripted round trip per bridgeable category through the bridge,
//! compares each result with the counterparty's documented transformation,
//! and collects the outcomes into a report.
//!
//! ## Modules
//!
//! - [`case`] - The scripted cases and their evaluation
//! - [`runner`] - Sequential execution with progress output
//! - [`report`] - Summary statistics, human and JSON rendering
//! - [`config`] - `ferry.toml` loading and case selection
//! - [`fixture`] - Function table for the bundled counterparty

pub mod case;
pub mod config;
pub mod error;
pub mod fixture;
pub mod report;
pub mod runner;

pub use case::{
    case_names, select_cases, standard_cases, ConformanceCase, Expectation, Observation, Outcome,
};
pub use config::{FerryConfig, HarnessConfig, ReportFormat, CONFIG_FILE};
pub use error::HarnessError;
pub use fixture::{fixture_surface, outstanding_buffers};
pub use report::{CaseResult, ConformanceReport, ReportSummary};
pub use runner::run_cases;
