//! Error types for the asset library
//!
//! Provides error handling for:
//! - Manifest loading (root asset list)
//! - Per-asset resolution (sidecar → normalized record)
//! - Cache persistence
//! - Request planning against the index
//! - Configuration loading

use std::path::PathBuf;

/// Main library error type
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Manifest could not be loaded
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An asset could not be resolved
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Cache read/write failed
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Request planning failed
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors while reading the root manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON or not an array of entries
    #[error("malformed manifest {path}: {source}")]
    Malformed {
        /// File involved
        path: PathBuf,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// One manifest entry does not have the expected shape
    #[error("bad entry {label} in manifest {path}: {reason}")]
    Entry {
        /// Manifest file
        path: PathBuf,
        /// Entry label
        label: String,
        /// Decoder message
        reason: String,
    },
}

/// Errors while resolving a single asset
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The per-asset sidecar is absent
    #[error("metadata file not found: {0}")]
    MissingSidecar(PathBuf),

    /// Declared asset type has no resolver
    #[error("unsupported asset type: {0}")]
    UnsupportedType(String),

    /// Sidecar could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Sidecar is not valid JSON of the expected shape
    #[error("malformed metadata file {path}: {source}")]
    Sidecar {
        /// File involved
        path: PathBuf,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors while reading or writing the persisted index
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Persisted index could not be decoded
    #[error("corrupt cache file {path}: {source}")]
    Corrupt {
        /// File involved
        path: PathBuf,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Index could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while planning host requests from the index
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// No asset with this key or id
    #[error("asset not found: {0}")]
    UnknownAsset(String),

    /// Asset has no geometry at the requested LOD
    #[error("asset {asset} has no LOD {lod} (available: {available})")]
    UnknownLod {
        /// Asset key
        asset: String,
        /// Requested LOD
        lod: String,
        /// LODs the asset has, comma separated
        available: String,
    },

    /// Asset directory recorded in the index no longer exists
    #[error("directory does not exist: {0}")]
    MissingDirectory(PathBuf),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// TOML parser error
        #[source]
        source: toml::de::Error,
    },

    /// No library path given anywhere
    #[error("library path is not configured")]
    MissingLibraryPath,
}

/// Result alias for library operations
pub type Result<T, E = LibraryError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = ResolveError::MissingSidecar(PathBuf::from("/lib/Downloaded/3d/rock/abc.json"));
        assert_eq!(
            err.to_string(),
            "metadata file not found: /lib/Downloaded/3d/rock/abc.json"
        );
    }

    #[test]
    fn conversions_wrap_sources() {
        let err: LibraryError = PlanError::UnknownAsset("xyz".into()).into();
        assert!(matches!(err, LibraryError::Plan(PlanError::UnknownAsset(_))));
        assert_eq!(err.to_string(), "plan error: asset not found: xyz");
    }
}
