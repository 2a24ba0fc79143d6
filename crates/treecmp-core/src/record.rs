//! Difference records produced by a comparison.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::entry::EntryKind;

/// Which side(s) of the comparison a difference pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// The first root.
    First,
    /// The second root.
    Second,
    /// Both roots.
    Both,
}

impl Location {
    /// The same location seen from the other side of a swapped comparison.
    pub fn swapped(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
            Self::Both => Self::Both,
        }
    }
}

/// Category of a difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Path exists only under the first root.
    OnlyInFirst,
    /// Path exists only under the second root.
    OnlyInSecond,
    /// Path exists on both sides with different entry kinds.
    TypeDiffers {
        first: EntryKind,
        second: EntryKind,
    },
    /// Regular files with different byte sizes.
    SizeDiffers {
        first: u64,
        second: u64,
    },
    /// Regular files of equal size whose bytes differ.
    ContentDiffers,
    /// The entry could not be read on at least one side.
    PermissionError,
}

impl DifferenceKind {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnlyInFirst => "only in first",
            Self::OnlyInSecond => "only in second",
            Self::TypeDiffers { .. } => "type differs",
            Self::SizeDiffers { .. } => "size differs",
            Self::ContentDiffers => "content differs",
            Self::PermissionError => "permission error",
        }
    }

    /// The same difference seen from the other side of a swapped comparison.
    pub fn swapped(self) -> Self {
        match self {
            Self::OnlyInFirst => Self::OnlyInSecond,
            Self::OnlyInSecond => Self::OnlyInFirst,
            Self::TypeDiffers { first, second } => Self::TypeDiffers {
                first: second,
                second: first,
            },
            Self::SizeDiffers { first, second } => Self::SizeDiffers {
                first: second,
                second: first,
            },
            other => other,
        }
    }
}

/// One reported discrepancy between the two trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    /// Base name of the relative path.
    pub name: CompactString,
    /// Path relative to both roots.
    pub relative_path: PathBuf,
    /// What differs.
    pub kind: DifferenceKind,
    /// Which side(s) the difference pertains to.
    pub location: Location,
}

impl DifferenceRecord {
    /// Create a record, deriving the name from the relative path.
    pub fn new(relative_path: impl Into<PathBuf>, kind: DifferenceKind, location: Location) -> Self {
        let relative_path = relative_path.into();
        Self {
            name: base_name(&relative_path),
            relative_path,
            kind,
            location,
        }
    }

    /// Path exists only under the first root.
    pub fn only_in_first(relative_path: impl Into<PathBuf>) -> Self {
        Self::new(relative_path, DifferenceKind::OnlyInFirst, Location::First)
    }

    /// Path exists only under the second root.
    pub fn only_in_second(relative_path: impl Into<PathBuf>) -> Self {
        Self::new(relative_path, DifferenceKind::OnlyInSecond, Location::Second)
    }

    /// Entry kinds differ between the two sides.
    pub fn type_differs(relative_path: impl Into<PathBuf>, first: EntryKind, second: EntryKind) -> Self {
        Self::new(
            relative_path,
            DifferenceKind::TypeDiffers { first, second },
            Location::Both,
        )
    }

    /// File sizes differ.
    pub fn size_differs(relative_path: impl Into<PathBuf>, first: u64, second: u64) -> Self {
        Self::new(
            relative_path,
            DifferenceKind::SizeDiffers { first, second },
            Location::Both,
        )
    }

    /// File contents differ.
    pub fn content_differs(relative_path: impl Into<PathBuf>) -> Self {
        Self::new(relative_path, DifferenceKind::ContentDiffers, Location::Both)
    }

    /// Entry unreadable at the given location.
    pub fn permission_error(relative_path: impl Into<PathBuf>, location: Location) -> Self {
        Self::new(relative_path, DifferenceKind::PermissionError, location)
    }

    /// The same record seen from the other side of a swapped comparison.
    pub fn swapped(&self) -> Self {
        Self {
            name: self.name.clone(),
            relative_path: self.relative_path.clone(),
            kind: self.kind.swapped(),
            location: self.location.swapped(),
        }
    }
}

fn base_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name_is_base_name() {
        let record = DifferenceRecord::only_in_first("a/b/c.txt");
        assert_eq!(record.name.as_str(), "c.txt");
        assert_eq!(record.relative_path, PathBuf::from("a/b/c.txt"));
        assert_eq!(record.location, Location::First);
    }

    #[test]
    fn test_swapped_size() {
        let record = DifferenceRecord::size_differs("f", 2, 4).swapped();
        assert_eq!(record.kind, DifferenceKind::SizeDiffers { first: 4, second: 2 });
        assert_eq!(record.location, Location::Both);
    }

    #[test]
    fn test_swapped_only_in() {
        let record = DifferenceRecord::only_in_second("x").swapped();
        assert_eq!(record.kind, DifferenceKind::OnlyInFirst);
        assert_eq!(record.location, Location::First);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DifferenceKind::ContentDiffers.label(), "content differs");
        assert_eq!(Location::Both.to_string(), "both");
    }
}
