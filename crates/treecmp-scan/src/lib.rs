//! Directory tree enumeration for treecmp.
//!
//! This crate walks a root with jwalk and produces a flat listing of every
//! entry beneath it, keyed by path relative to the root.
//!
//! # Overview
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Best-effort**: directories that cannot be listed are recorded as
//!   unreadable and reported as warnings; the walk continues
//! - **Filtering** of hidden entries and ignore patterns, pruned at read time
//!
//! # Example
//!
//! ```rust,no_run
//! use treecmp_scan::{CompareConfig, JwalkEnumerator};
//!
//! let config = CompareConfig::new();
//! let listing = JwalkEnumerator::new().enumerate("/path/to/root", &config).unwrap();
//!
//! println!("{} entries", listing.len());
//! for warning in &listing.warnings {
//!     eprintln!("{}", warning.message);
//! }
//! ```

mod enumerator;
mod listing;

pub use enumerator::JwalkEnumerator;
pub use listing::TreeListing;

// Re-export core types for convenience
pub use treecmp_core::{CompareConfig, CompareError, EntryKind, ScanWarning, SideStats, WarningKind};
