//! Hash-gated index cache
//!
//! The index is rebuilt only when the canonical SHA-256 of the root manifest
//! differs from the hash persisted next to the last index. The index is
//! written before the hash, so an interrupted write leaves the cache invalid
//! rather than stale.

use crate::error::{CacheError, LibraryError};
use crate::index::LibraryIndex;
use crate::manifest::{hash_manifest_file, Manifest};
use crate::paths::LibraryPaths;
use crate::scanner::{LibraryScanner, ScanReport};
use msx_hash::ContentHash;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// How an index was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    /// Persisted index was current and loaded as is
    Hit,
    /// Index was resolved from scratch and persisted
    Rebuilt,
    /// No manifest on disk; the index is empty
    NoManifest,
}

/// Result of [`IndexCache::load_or_build`]
#[derive(Debug, Clone)]
pub struct CacheOutcome {
    /// The index
    pub index: LibraryIndex,
    /// How it was obtained
    pub status: CacheStatus,
    /// Manifest hash the index corresponds to
    pub hash: Option<ContentHash>,
    /// Scan summary when the index was rebuilt
    pub report: Option<ScanReport>,
}

/// Snapshot of the cache files for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct CacheState {
    /// Manifest file exists
    pub manifest_present: bool,
    /// Persisted index exists
    pub index_present: bool,
    /// Hash stored alongside the index
    pub stored_hash: Option<ContentHash>,
    /// Hash of the manifest as it is now
    pub current_hash: Option<ContentHash>,
    /// Cache would be served without rebuilding
    pub valid: bool,
}

/// Persisted index for one library
#[derive(Debug, Clone)]
pub struct IndexCache {
    paths: LibraryPaths,
}

impl IndexCache {
    /// Cache over the given layout
    #[must_use]
    pub fn new(paths: LibraryPaths) -> Self {
        Self { paths }
    }

    /// Library layout
    #[must_use]
    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// Hash persisted by the last rebuild, if readable
    #[must_use]
    pub fn stored_hash(&self) -> Option<ContentHash> {
        let text = fs::read_to_string(&self.paths.hash).ok()?;
        text.parse().ok()
    }

    /// Hash of the manifest on disk, `None` if it is absent
    ///
    /// # Errors
    /// Returns error if the manifest exists but cannot be read or parsed
    pub fn current_hash(&self) -> Result<Option<ContentHash>, LibraryError> {
        if !self.paths.manifest.is_file() {
            return Ok(None);
        }
        Ok(Some(hash_manifest_file(&self.paths.manifest)?))
    }

    /// True when manifest, hash and index all exist and the hashes agree
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state().valid
    }

    /// Inspect the cache files without modifying them
    #[must_use]
    pub fn state(&self) -> CacheState {
        let manifest_present = self.paths.manifest.is_file();
        let index_present = self.paths.index.is_file();
        let stored_hash = self.stored_hash();
        let current_hash = self.current_hash().ok().flatten();
        let valid = index_present && stored_hash.is_some() && stored_hash == current_hash;
        CacheState {
            manifest_present,
            index_present,
            stored_hash,
            current_hash,
            valid,
        }
    }

    /// Read the persisted index
    ///
    /// # Errors
    /// Returns error if the index file is missing or corrupt
    pub fn load(&self) -> Result<LibraryIndex, CacheError> {
        let path = &self.paths.index;
        let bytes = fs::read(path).map_err(|e| CacheError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| CacheError::Corrupt {
            path: path.clone(),
            source,
        })
    }

    /// Persist `index` and then the manifest `hash` it was built from
    ///
    /// # Errors
    /// Returns error if the cache folder or files cannot be written
    pub fn store(&self, index: &LibraryIndex, hash: &ContentHash) -> Result<(), CacheError> {
        let dir = &self.paths.cache_dir;
        fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;
        write_atomic(&self.paths.index, &index.to_pretty_json()?)?;
        write_atomic(&self.paths.hash, hash.to_string().as_bytes())?;
        tracing::debug!("Stored index of {} assets under {}", index.len(), dir.display());
        Ok(())
    }

    /// Serve the persisted index if current, otherwise scan and persist
    ///
    /// # Errors
    /// Returns error if the manifest is unreadable, a strict scan fails, or
    /// the rebuilt index cannot be persisted
    pub fn load_or_build(&self, scanner: &LibraryScanner) -> Result<CacheOutcome, LibraryError> {
        self.load_or_build_with(|manifest| scanner.scan(manifest))
    }

    /// [`Self::load_or_build`] with a custom index builder
    ///
    /// # Errors
    /// See [`Self::load_or_build`]
    pub fn load_or_build_with<F>(&self, build: F) -> Result<CacheOutcome, LibraryError>
    where
        F: FnOnce(&Manifest) -> Result<(LibraryIndex, ScanReport), LibraryError>,
    {
        if !self.paths.manifest.is_file() {
            return Ok(self.no_manifest());
        }

        let manifest = Manifest::load(&self.paths.manifest)?;
        let hash = manifest.content_hash();

        if self.stored_hash() == Some(hash) {
            match self.load() {
                Ok(index) if index.all_under(&self.paths.downloaded) => {
                    tracing::info!("Index cache hit ({}), {} assets", hash.short(), index.len());
                    return Ok(CacheOutcome {
                        index,
                        status: CacheStatus::Hit,
                        hash: Some(hash),
                        report: None,
                    });
                }
                Ok(_) => tracing::info!("Cached index points outside this library, rebuilding"),
                Err(err) => tracing::warn!("Discarding unreadable index cache: {err}"),
            }
        } else {
            tracing::info!("Manifest changed ({}), rebuilding index", hash.short());
        }

        self.build_and_store(&manifest, hash, build)
    }

    /// Scan and persist regardless of the stored hash
    ///
    /// Without a manifest the index is empty and any cache files left from an
    /// earlier manifest are deleted.
    ///
    /// # Errors
    /// Returns error if the manifest is unreadable, a strict scan fails, or
    /// the cache files cannot be written or removed
    pub fn rebuild(&self, scanner: &LibraryScanner) -> Result<CacheOutcome, LibraryError> {
        if !self.paths.manifest.is_file() {
            self.clear()?;
            return Ok(self.no_manifest());
        }
        let manifest = Manifest::load(&self.paths.manifest)?;
        let hash = manifest.content_hash();
        self.build_and_store(&manifest, hash, |m| scanner.scan(m))
    }

    /// Delete the persisted index and hash
    ///
    /// # Errors
    /// Returns error if an existing file cannot be removed
    pub fn clear(&self) -> Result<(), CacheError> {
        for path in [&self.paths.hash, &self.paths.index] {
            match fs::remove_file(path) {
                Ok(()) => tracing::debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(path, e)),
            }
        }
        Ok(())
    }

    fn no_manifest(&self) -> CacheOutcome {
        tracing::info!("No manifest at {}", self.paths.manifest.display());
        CacheOutcome {
            index: LibraryIndex::new(),
            status: CacheStatus::NoManifest,
            hash: None,
            report: None,
        }
    }

    fn build_and_store<F>(
        &self,
        manifest: &Manifest,
        hash: ContentHash,
        build: F,
    ) -> Result<CacheOutcome, LibraryError>
    where
        F: FnOnce(&Manifest) -> Result<(LibraryIndex, ScanReport), LibraryError>,
    {
        let (index, report) = build(manifest)?;
        self.store(&index, &hash)?;
        Ok(CacheOutcome {
            index,
            status: CacheStatus::Rebuilt,
            hash: Some(hash),
            report: Some(report),
        })
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CacheError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| CacheError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| CacheError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use msx_test_utils::{sample_model, LibraryFixture};
    use std::cell::Cell;

    fn setup() -> (LibraryFixture, IndexCache, LibraryScanner) {
        let lib = LibraryFixture::new().with_assets(&[sample_model("tbdpec3r", "Mossy Rock")]);
        let paths = LibraryPaths::new(lib.root());
        let scanner = LibraryScanner::new(&paths.downloaded);
        (lib, IndexCache::new(paths), scanner)
    }

    #[test]
    fn first_run_rebuilds_and_persists() {
        let (_lib, cache, scanner) = setup();
        assert!(!cache.is_valid());

        let outcome = cache.load_or_build(&scanner).unwrap();
        assert_eq!(outcome.status, CacheStatus::Rebuilt);
        assert_eq!(outcome.index.len(), 1);
        assert!(cache.is_valid());
        assert_eq!(cache.stored_hash(), outcome.hash);
    }

    #[test]
    fn hit_skips_resolution() {
        let (_lib, cache, scanner) = setup();
        cache.load_or_build(&scanner).unwrap();

        let calls = Cell::new(0);
        let outcome = cache
            .load_or_build_with(|m| {
                calls.set(calls.get() + 1);
                scanner.scan(m)
            })
            .unwrap();
        assert_eq!(outcome.status, CacheStatus::Hit);
        assert_eq!(calls.get(), 0);
        assert!(outcome.report.is_none());
    }

    #[test]
    fn hash_file_is_bare_hex() {
        let (_lib, cache, scanner) = setup();
        let outcome = cache.load_or_build(&scanner).unwrap();
        let text = fs::read_to_string(&cache.paths().hash).unwrap();
        assert_eq!(text.len(), 64);
        assert_eq!(Some(text.parse::<ContentHash>().unwrap()), outcome.hash);
    }

    #[test]
    fn corrupt_index_is_rebuilt() {
        let (_lib, cache, scanner) = setup();
        cache.load_or_build(&scanner).unwrap();
        fs::write(&cache.paths().index, "{ not json").unwrap();

        let outcome = cache.load_or_build(&scanner).unwrap();
        assert_eq!(outcome.status, CacheStatus::Rebuilt);
        assert_eq!(cache.load().unwrap().len(), 1);
    }

    #[test]
    fn missing_manifest_gives_empty_index() {
        let lib = LibraryFixture::new();
        let paths = LibraryPaths::new(lib.root());
        let scanner = LibraryScanner::new(&paths.downloaded);
        let cache = IndexCache::new(paths);

        let outcome = cache.load_or_build(&scanner).unwrap();
        assert_eq!(outcome.status, CacheStatus::NoManifest);
        assert!(outcome.index.is_empty());
        assert!(!cache.paths().index.exists());
    }

    #[test]
    fn clear_removes_files_and_tolerates_absence() {
        let (_lib, cache, scanner) = setup();
        cache.load_or_build(&scanner).unwrap();
        cache.clear().unwrap();
        assert!(!cache.paths().index.exists());
        assert!(!cache.paths().hash.exists());
        cache.clear().unwrap();
    }

    #[test]
    fn state_reports_mismatch() {
        let (lib, cache, scanner) = setup();
        cache.load_or_build(&scanner).unwrap();
        lib.write_raw_manifest("[]");

        let state = cache.state();
        assert!(state.manifest_present);
        assert!(state.index_present);
        assert!(!state.valid);
        assert_ne!(state.stored_hash, state.current_hash);
    }
}
