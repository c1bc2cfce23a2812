//! Configuration
//!
//! Loaded from a TOML file (`msx.toml` by default):
//!
//! ```toml
//! library_path = "/data/Megascans Library"
//! cache_dir = "/tmp/msx-cache"   # optional
//! strict = false
//!
//! [bridge]
//! url = "http://localhost:28241/GetMegascansFolder/"
//! timeout_secs = 5
//! ```

use crate::error::ConfigError;
use crate::paths::LibraryPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "msx.toml";

/// Default companion-app endpoint returning the library folder
pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:28241/GetMegascansFolder/";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsxConfig {
    /// Library root (the folder containing `Downloaded`)
    pub library_path: Option<PathBuf>,
    /// Override for the cache folder
    pub cache_dir: Option<PathBuf>,
    /// Abort a scan on the first asset that fails to resolve
    pub strict: bool,
    /// Companion desktop app settings
    pub bridge: BridgeConfig,
}

/// Companion desktop app endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// URL answering with `{"folder": ...}`
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BRIDGE_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl MsxConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML config file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit file if given, else `msx.toml` in `dir` when present, else defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but is unreadable or invalid
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!("Using config {}", candidate.display());
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// With library root
    #[inline]
    #[must_use]
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// With cache folder override
    #[inline]
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// With strict scanning
    #[inline]
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// With bridge endpoint
    #[inline]
    #[must_use]
    pub fn with_bridge_url(mut self, url: impl Into<String>) -> Self {
        self.bridge.url = url.into();
        self
    }

    /// Library layout for the configured root
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingLibraryPath`] if no root is set
    pub fn paths(&self) -> Result<LibraryPaths, ConfigError> {
        let root = self
            .library_path
            .as_ref()
            .ok_or(ConfigError::MissingLibraryPath)?;
        let paths = LibraryPaths::new(root);
        Ok(match &self.cache_dir {
            Some(dir) => paths.with_cache_dir(dir),
            None => paths,
        })
    }

    /// TOML text of this configuration
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
