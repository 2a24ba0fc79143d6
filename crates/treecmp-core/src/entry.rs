//! Entry kinds and enumerated path entries.

use std::fs::{FileType, Metadata};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Type of a file system entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (regardless of what it points to).
    Symlink,
    /// Sockets, FIFOs, device nodes.
    Other,
}

impl EntryKind {
    /// Classify a file type. Symlinks take precedence over their target.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Classify metadata obtained with `symlink_metadata`.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self::from_file_type(metadata.file_type())
    }
}

/// A path discovered beneath a root, relative to that root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Path relative to the root it was found under.
    pub relative_path: PathBuf,
    /// Kind observed during the walk.
    pub kind: EntryKind,
}

impl PathEntry {
    /// Create a new path entry.
    pub fn new(relative_path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind,
        }
    }
}
