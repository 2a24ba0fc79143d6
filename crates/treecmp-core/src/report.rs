//! Comparison report container.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::platform::Platform;
use crate::record::DifferenceRecord;

/// Counts of what was enumerated under one root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideStats {
    /// Regular files.
    pub files: u64,
    /// Directories.
    pub dirs: u64,
    /// Symbolic links.
    pub symlinks: u64,
    /// Other entry kinds.
    pub other: u64,
}

impl SideStats {
    /// Total number of entries.
    pub fn total(&self) -> u64 {
        self.files + self.dirs + self.symlinks + self.other
    }
}

/// Result of comparing two trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareReport {
    /// First root, as compared.
    pub first_root: PathBuf,

    /// Second root, as compared.
    pub second_root: PathBuf,

    /// Differences, sorted by relative path.
    pub records: Vec<DifferenceRecord>,

    /// Number of records.
    pub total_count: usize,

    /// Traversal warnings from both sides.
    pub warnings: Vec<ScanWarning>,

    /// Entries enumerated under the first root.
    pub first_stats: SideStats,

    /// Entries enumerated under the second root.
    pub second_stats: SideStats,

    /// Platform the comparison ran on.
    pub platform: Platform,

    /// Wall-clock duration of the comparison.
    pub duration: Duration,
}

impl CompareReport {
    /// Create a report; `total_count` is taken from `records`.
    pub fn new(
        first_root: PathBuf,
        second_root: PathBuf,
        records: Vec<DifferenceRecord>,
        warnings: Vec<ScanWarning>,
        stats: (SideStats, SideStats),
        platform: Platform,
        duration: Duration,
    ) -> Self {
        Self {
            first_root,
            second_root,
            total_count: records.len(),
            records,
            warnings,
            first_stats: stats.0,
            second_stats: stats.1,
            platform,
            duration,
        }
    }

    /// Check if no differences were found.
    pub fn is_identical(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if there were any warnings during enumeration.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_matches_records() {
        let records = vec![
            DifferenceRecord::only_in_first("a"),
            DifferenceRecord::content_differs("b"),
        ];
        let report = CompareReport::new(
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            records,
            Vec::new(),
            (SideStats::default(), SideStats::default()),
            Platform::Linux,
            Duration::ZERO,
        );

        assert_eq!(report.total_count, 2);
        assert!(!report.is_identical());
    }

    #[test]
    fn test_side_stats_total() {
        let stats = SideStats {
            files: 3,
            dirs: 2,
            symlinks: 1,
            other: 0,
        };
        assert_eq!(stats.total(), 6);
    }
}
