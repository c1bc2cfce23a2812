//! msx asset library
//!
//! Normalizes a downloaded asset library into a uniform index and keeps that
//! index cached behind a manifest hash.
//!
//! # Core Concepts
//!
//! - [`Manifest`]: the root JSON list of downloaded assets
//! - [`AssetResolver`]: per-type reshaping of a sidecar into an [`AssetRecord`]
//! - [`LibraryIndex`]: `type::name::id` → record, the document the host reads
//! - [`IndexCache`]: rebuilds the index only when the manifest hash changes
//! - [`plan`]: geometry, texture, shader and batch requests for the host
//!
//! # Example
//!
//! ```rust,ignore
//! use msx_library::{Library, MsxConfig};
//!
//! let config = MsxConfig::new().with_library_path("/data/Megascans Library");
//! let outcome = Library::open(&config)?.index()?;
//! println!("{:?}: {} assets", outcome.status, outcome.index.len());
//! ```

#![warn(unreachable_pub)]

mod cache;
mod config;
mod error;
mod index;
mod key;
mod library;
mod lod;
mod manifest;
mod paths;
mod record;
mod resolve;
mod scanner;
mod sidecar;

pub mod plan;

pub use cache::{CacheOutcome, CacheState, CacheStatus, IndexCache};
pub use config::{BridgeConfig, MsxConfig, DEFAULT_BRIDGE_URL, DEFAULT_CONFIG_FILE};
pub use error::{CacheError, ConfigError, LibraryError, ManifestError, PlanError, ResolveError, Result};
pub use index::LibraryIndex;
pub use key::{id_of_label, normalize_name, AssetKey, AssetType, KeyError};
pub use library::Library;
pub use lod::{lod_rank, model_lod, plant_lod, HIGH};
pub use manifest::{hash_manifest_file, Manifest, ManifestEntry, RejectedEntry};
pub use paths::LibraryPaths;
pub use record::{AssetRecord, LodMap, TextureChannel, TextureSet};
pub use resolve::{resolve_asset, resolver_for, AssetResolver, ModelResolver, PlantResolver, ResolvedMeshes};
pub use scanner::{LibraryScanner, ScanReport, SkippedAsset};
pub use sidecar::{Component, ComponentResolution, ComponentUri, MeshEntry, Sidecar, TextureMap, UriRef};

pub use msx_hash::ContentHash;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
