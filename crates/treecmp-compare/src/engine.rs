//! The comparison engine.
//!
//! Walks both roots, unions their relative paths, and classifies each path
//! in sorted order:
//!
//! 1. Present on one side only
//! 2. Present on both sides with different entry kinds
//! 3. Directories: nothing to report unless one side could not be listed
//! 4. Regular files: readability, then size, then bytes
//!
//! Content is only read once sizes are known to be equal.

use std::collections::BTreeSet;
use std::fs::{self, File, Metadata};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use treecmp_core::{
    CompareConfig, CompareError, CompareReport, DifferenceRecord, EntryKind, Location,
};
use treecmp_scan::{JwalkEnumerator, TreeListing};

use crate::content::{ByteComparer, ContentComparer};

/// Outcome of looking up a relative path under one root.
enum Probe {
    Present(Metadata),
    Absent,
    Denied,
}

/// Compares two directory trees.
pub struct CompareEngine<C = ByteComparer> {
    config: CompareConfig,
    enumerator: JwalkEnumerator,
    comparer: C,
}

impl CompareEngine<ByteComparer> {
    /// Create an engine with default config.
    pub fn new() -> Self {
        Self::with_config(CompareConfig::default())
    }

    /// Create an engine with custom config.
    pub fn with_config(config: CompareConfig) -> Self {
        let comparer = ByteComparer::new(config.chunk_size);
        Self::with_comparer(config, comparer)
    }
}

impl Default for CompareEngine<ByteComparer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ContentComparer> CompareEngine<C> {
    /// Create an engine with a custom content comparer.
    pub fn with_comparer(config: CompareConfig, comparer: C) -> Self {
        Self {
            config,
            enumerator: JwalkEnumerator::new(),
            comparer,
        }
    }

    /// Content comparer in use.
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Compare two validated directory roots.
    ///
    /// Records come back sorted by relative path, with at most one record
    /// per path.
    pub fn compare(&self, first: impl AsRef<Path>, second: impl AsRef<Path>) -> Result<CompareReport, CompareError> {
        let start = Instant::now();
        let first = first.as_ref();
        let second = second.as_ref();

        tracing::debug!(
            first = %first.display(),
            second = %second.display(),
            platform = %self.config.platform,
            "starting comparison"
        );

        let (records, first_listing, second_listing) = match self.config.threads {
            0 | 1 => self.run(first, second)?,
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| CompareError::ThreadPool {
                        message: e.to_string(),
                    })?;
                pool.install(|| self.run(first, second))?
            }
        };

        let mut warnings = first_listing.warnings;
        warnings.extend(second_listing.warnings);

        let report = CompareReport::new(
            first.to_path_buf(),
            second.to_path_buf(),
            records,
            warnings,
            (first_listing.stats, second_listing.stats),
            self.config.platform,
            start.elapsed(),
        );

        tracing::info!(
            differences = report.total_count,
            warnings = report.warnings.len(),
            elapsed_ms = report.duration.as_millis() as u64,
            "comparison finished"
        );

        Ok(report)
    }

    /// Enumerate and classify, on whatever pool is current.
    fn run(&self, first: &Path, second: &Path) -> Result<(Vec<DifferenceRecord>, TreeListing, TreeListing), CompareError> {
        let (first_listing, second_listing) = if self.config.threads == 1 {
            (
                self.enumerator.enumerate(first, &self.config),
                self.enumerator.enumerate(second, &self.config),
            )
        } else {
            rayon::join(
                || self.enumerator.enumerate(first, &self.config),
                || self.enumerator.enumerate(second, &self.config),
            )
        };
        let first_listing = first_listing?;
        let second_listing = second_listing?;

        let paths = union(&first_listing, &second_listing);
        tracing::debug!(paths = paths.len(), "classifying union");

        let classify = |path: &PathBuf| self.classify(path, &first_listing, &second_listing);
        let outcomes: Vec<Result<Option<DifferenceRecord>, CompareError>> = if self.config.threads == 1 {
            paths.iter().map(classify).collect()
        } else {
            // Indexed collect keeps the sorted input order
            paths.par_iter().map(classify).collect()
        };

        let mut records = Vec::new();
        for outcome in outcomes {
            if let Some(record) = outcome? {
                records.push(record);
            }
        }

        Ok((records, first_listing, second_listing))
    }

    /// Classify one relative path.
    fn classify(
        &self,
        relative: &Path,
        first: &TreeListing,
        second: &TreeListing,
    ) -> Result<Option<DifferenceRecord>, CompareError> {
        // Inside a directory we could not list: unknown, not missing
        if first.is_shadowed(relative) || second.is_shadowed(relative) {
            return Ok(None);
        }

        let first_path = first.root.join(relative);
        let second_path = second.root.join(relative);

        let (first_meta, second_meta) = match (probe(&first_path)?, probe(&second_path)?) {
            (Probe::Denied, Probe::Denied) => {
                return Ok(Some(DifferenceRecord::permission_error(relative, Location::Both)));
            }
            (Probe::Denied, _) => {
                return Ok(Some(DifferenceRecord::permission_error(relative, Location::First)));
            }
            (_, Probe::Denied) => {
                return Ok(Some(DifferenceRecord::permission_error(relative, Location::Second)));
            }
            // Vanished from both sides since enumeration
            (Probe::Absent, Probe::Absent) => return Ok(None),
            (Probe::Present(_), Probe::Absent) => {
                return Ok(Some(DifferenceRecord::only_in_first(relative)));
            }
            (Probe::Absent, Probe::Present(_)) => {
                return Ok(Some(DifferenceRecord::only_in_second(relative)));
            }
            (Probe::Present(a), Probe::Present(b)) => (a, b),
        };

        let first_kind = EntryKind::from_metadata(&first_meta);
        let second_kind = EntryKind::from_metadata(&second_meta);

        if first_kind != second_kind {
            return Ok(Some(DifferenceRecord::type_differs(relative, first_kind, second_kind)));
        }

        match first_kind {
            EntryKind::Directory => Ok(unreadable_location(
                first.is_unreadable(relative),
                second.is_unreadable(relative),
            )
            .map(|location| DifferenceRecord::permission_error(relative, location))),
            EntryKind::File => self.compare_files(relative, &first_path, &second_path, &first_meta, &second_meta),
            // No target resolution for symlinks; nothing to read for special files
            EntryKind::Symlink | EntryKind::Other => Ok(None),
        }
    }

    /// Readability, then size, then content.
    fn compare_files(
        &self,
        relative: &Path,
        first_path: &Path,
        second_path: &Path,
        first_meta: &Metadata,
        second_meta: &Metadata,
    ) -> Result<Option<DifferenceRecord>, CompareError> {
        let first_readable = readable(first_path)?;
        let second_readable = readable(second_path)?;
        if !first_readable || !second_readable {
            return Ok(Some(DifferenceRecord::permission_error(relative, Location::Both)));
        }

        let first_size = first_meta.len();
        let second_size = second_meta.len();
        if first_size != second_size {
            return Ok(Some(DifferenceRecord::size_differs(relative, first_size, second_size)));
        }

        match self.comparer.contents_equal(first_path, second_path) {
            Ok(true) => Ok(None),
            Ok(false) => Ok(Some(DifferenceRecord::content_differs(relative))),
            Err(CompareError::PermissionDenied { .. }) => {
                Ok(Some(DifferenceRecord::permission_error(relative, Location::Both)))
            }
            // Already names the file that failed
            Err(e) => Err(e),
        }
    }
}

/// Sorted, deduplicated union of both listings' relative paths.
fn union(first: &TreeListing, second: &TreeListing) -> Vec<PathBuf> {
    first
        .entries
        .keys()
        .chain(second.entries.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

/// Look a path up without following a final symlink.
fn probe(path: &Path) -> Result<Probe, CompareError> {
    match fs::symlink_metadata(path) {
        Ok(metadata) => Ok(Probe::Present(metadata)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Probe::Absent),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(Probe::Denied),
        Err(e) => Err(CompareError::io(path, e)),
    }
}

/// Check if a file can be opened for reading.
fn readable(path: &Path) -> Result<bool, CompareError> {
    match File::open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Ok(false),
        Err(e) => Err(CompareError::io(path, e)),
    }
}

fn unreadable_location(first: bool, second: bool) -> Option<Location> {
    match (first, second) {
        (true, true) => Some(Location::Both),
        (true, false) => Some(Location::First),
        (false, true) => Some(Location::Second),
        (false, false) => None,
    }
}
