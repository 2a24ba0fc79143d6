//! Core types and configuration for treecmp.
//!
//! This crate provides the data structures shared by the enumerator, the
//! comparison engine and the CLI: entry kinds, difference records, the
//! comparison report, configuration and error types.

mod config;
mod entry;
mod error;
mod platform;
mod record;
mod report;

pub use config::{CompareConfig, CompareConfigBuilder};
pub use entry::{EntryKind, PathEntry};
pub use error::{CompareError, ScanWarning, ValidationError, WarningKind};
pub use platform::Platform;
pub use record::{DifferenceKind, DifferenceRecord, Location};
pub use report::{CompareReport, SideStats};
