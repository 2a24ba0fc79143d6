//! Error and warning types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Permission denied for a path outside of per-file classification.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path disappeared while it was being compared.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tree could not be walked at all.
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Worker pool could not be created.
    #[error("Failed to build worker pool: {message}")]
    ThreadPool { message: String },
}

impl CompareError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors raised while validating a root before comparison.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No path was given.
    #[error("{label}: no path given")]
    Empty { label: String },

    /// Path does not exist.
    #[error("{label}: path does not exist: {path}")]
    NotFound { label: String, path: PathBuf },

    /// Path exists but is not a directory.
    #[error("{label}: not a directory: {path}")]
    NotADirectory { label: String, path: PathBuf },

    /// Directory cannot be listed.
    #[error("{label}: permission denied: {path}")]
    PermissionDenied { label: String, path: PathBuf },

    /// Any other I/O failure.
    #[error("{label}: cannot access {path}: {source}")]
    Io {
        label: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    /// Create a validation error from an I/O error with label and path context.
    pub fn io(label: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let label = label.into();
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { label, path },
            std::io::ErrorKind::NotFound => Self::NotFound { label, path },
            _ => Self::Io {
                label,
                path,
                source,
            },
        }
    }
}

/// Kind of traversal warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A directory could not be listed.
    PermissionDenied,
    /// Error reading a directory entry.
    ReadError,
}

/// Non-fatal problem encountered while enumerating a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let message = format!("Permission denied: {}", path.display());
        Self::new(path, message, WarningKind::PermissionDenied)
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::new(path, format!("Read error: {error}"), WarningKind::ReadError)
    }
}
