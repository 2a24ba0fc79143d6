//! Root path validation.

use std::fs;
use std::path::{Path, PathBuf};

use treecmp_core::ValidationError;

/// Check that `candidate` is an existing, listable directory.
///
/// Returns the canonical path on success. `label` names the root in error
/// messages (for example "first folder").
pub fn validate_root(label: &str, candidate: impl AsRef<Path>) -> Result<PathBuf, ValidationError> {
    let candidate = candidate.as_ref();
    if candidate.as_os_str().is_empty() {
        return Err(ValidationError::Empty {
            label: label.to_string(),
        });
    }

    let metadata = fs::metadata(candidate).map_err(|e| ValidationError::io(label, candidate, e))?;
    if !metadata.is_dir() {
        return Err(ValidationError::NotADirectory {
            label: label.to_string(),
            path: candidate.to_path_buf(),
        });
    }

    fs::read_dir(candidate).map_err(|e| ValidationError::io(label, candidate, e))?;

    candidate
        .canonicalize()
        .map_err(|e| ValidationError::io(label, candidate, e))
}
