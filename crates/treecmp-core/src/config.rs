//! Comparison configuration types.

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::CompareError;
use crate::platform::Platform;

/// Default read buffer for content comparison.
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration for a comparison run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CompareConfig {
    /// Include hidden entries (names starting with `.`).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Entry names to leave out of both trees (glob syntax).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of worker threads (0 = auto-detect, 1 = sequential).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Buffer size used when comparing file contents.
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Host platform, detected once by the caller.
    #[builder(default)]
    #[serde(default)]
    pub platform: Platform,
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl CompareConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == Some(0) {
            return Err("Chunk size must be greater than zero".to_string());
        }
        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern '{pattern}': {e}"))?;
            }
        }
        Ok(())
    }
}

impl CompareConfig {
    /// Create a new config builder.
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }

    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            include_hidden: true,
            ignore_patterns: Vec::new(),
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            platform: Platform::host(),
        }
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, CompareError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| CompareError::InvalidConfig {
                message: format!("Invalid ignore pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| CompareError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self::new()
    }
}
