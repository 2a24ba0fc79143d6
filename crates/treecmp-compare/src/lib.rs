//! Directory tree comparison engine for treecmp.
//!
//! Compares two directory roots and reports every relative path at which
//! they differ:
//!
//! - **Only in first / only in second** - the path exists on one side
//! - **Type differs** - file on one side, directory or symlink on the other
//! - **Size differs** - regular files with different lengths
//! - **Content differs** - equal-length files whose bytes differ
//! - **Permission error** - the entry could not be read on some side
//!
//! Sizes are compared before contents, so files of different lengths are
//! never read.
//!
//! ```rust,no_run
//! use treecmp_compare::{CompareEngine, validate_root};
//!
//! let first = validate_root("first folder", "/mnt/primary").unwrap();
//! let second = validate_root("second folder", "/mnt/backup").unwrap();
//!
//! let report = CompareEngine::new().compare(&first, &second).unwrap();
//! for record in &report.records {
//!     println!("{}: {}", record.kind.label(), record.relative_path.display());
//! }
//! println!("{} differences", report.total_count);
//! ```

mod content;
mod engine;
mod validate;

pub use content::{ByteComparer, ContentComparer};
pub use engine::CompareEngine;
pub use validate::validate_root;

// Re-export core types
pub use treecmp_core::{
    CompareConfig, CompareError, CompareReport, DifferenceKind, DifferenceRecord, EntryKind,
    Location, Platform, ScanWarning, SideStats, ValidationError,
};
