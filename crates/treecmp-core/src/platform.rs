//! Host platform detection.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Operating system the comparison runs on.
///
/// Detected once at startup and carried through the configuration into the
/// report, so nothing below the entry point needs to query the host again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[strum(serialize = "Linux")]
    Linux,
    #[strum(serialize = "macOS")]
    MacOs,
    #[strum(serialize = "Windows")]
    Windows,
    #[strum(serialize = "unsupported")]
    Unsupported,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub const fn host() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unsupported
        }
    }

    /// The host platform, or `None` when treecmp does not run there.
    pub fn detect() -> Option<Self> {
        Some(Self::host()).filter(|p| p.is_supported())
    }

    /// Check if treecmp supports running on this platform.
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}
