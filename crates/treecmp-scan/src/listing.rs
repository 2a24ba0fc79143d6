//! Flat listing of one enumerated tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use treecmp_core::{EntryKind, PathEntry, ScanWarning, SideStats};

/// Every entry found strictly beneath a root, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct TreeListing {
    /// Root the listing was taken from.
    pub root: PathBuf,
    /// Relative path to the kind observed during the walk.
    pub entries: BTreeMap<PathBuf, EntryKind>,
    /// Relative paths of directories whose contents could not be listed.
    pub unreadable: BTreeSet<PathBuf>,
    /// Non-fatal problems hit during the walk.
    pub warnings: Vec<ScanWarning>,
    /// Counts by entry kind.
    pub stats: SideStats,
}

impl TreeListing {
    /// Create an empty listing for a root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Record an entry.
    pub fn insert(&mut self, entry: PathEntry) {
        match entry.kind {
            EntryKind::File => self.stats.files += 1,
            EntryKind::Directory => self.stats.dirs += 1,
            EntryKind::Symlink => self.stats.symlinks += 1,
            EntryKind::Other => self.stats.other += 1,
        }
        self.entries.insert(entry.relative_path, entry.kind);
    }

    /// Mark a directory as unreadable.
    pub fn mark_unreadable(&mut self, relative_path: PathBuf, warning: ScanWarning) {
        self.unreadable.insert(relative_path);
        self.warnings.push(warning);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was found beneath the root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a relative path was enumerated.
    pub fn contains(&self, relative_path: &Path) -> bool {
        self.entries.contains_key(relative_path)
    }

    /// Check if a directory could not be listed.
    pub fn is_unreadable(&self, relative_path: &Path) -> bool {
        self.unreadable.contains(relative_path)
    }

    /// Check if a path lies inside a directory that could not be listed.
    ///
    /// Such paths are unknown on this side rather than missing.
    pub fn is_shadowed(&self, relative_path: &Path) -> bool {
        relative_path
            .ancestors()
            .skip(1)
            .any(|ancestor| self.unreadable.contains(ancestor))
    }
}
