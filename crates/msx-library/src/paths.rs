//! On-disk layout of a library and its cache

use std::path::{Path, PathBuf};

/// Folder holding downloaded assets and the manifest
pub const DOWNLOADED_DIR: &str = "Downloaded";
/// Root manifest file name
pub const MANIFEST_FILE: &str = "assetsData.json";
/// Default cache folder name, created inside `Downloaded`
pub const CACHE_DIR: &str = ".msx";
/// Persisted index file name
pub const INDEX_FILE: &str = "index.json";
/// Persisted manifest hash file name
pub const HASH_FILE: &str = "manifest.sha256";

/// Resolved locations for one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPaths {
    /// Library root as configured
    pub root: PathBuf,
    /// `<root>/Downloaded`
    pub downloaded: PathBuf,
    /// `<root>/Downloaded/assetsData.json`
    pub manifest: PathBuf,
    /// Directory holding the cache files
    pub cache_dir: PathBuf,
    /// Persisted index
    pub index: PathBuf,
    /// Persisted manifest hash
    pub hash: PathBuf,
}

impl LibraryPaths {
    /// Default layout for a library root
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let downloaded = root.join(DOWNLOADED_DIR);
        let cache_dir = downloaded.join(CACHE_DIR);
        Self {
            manifest: downloaded.join(MANIFEST_FILE),
            index: cache_dir.join(INDEX_FILE),
            hash: cache_dir.join(HASH_FILE),
            cache_dir,
            downloaded,
            root,
        }
    }

    /// Same library, cache files kept in `dir`
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self.index = self.cache_dir.join(INDEX_FILE);
        self.hash = self.cache_dir.join(HASH_FILE);
        self
    }

    /// Library root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let paths = LibraryPaths::new("/lib");
        assert_eq!(paths.manifest, PathBuf::from("/lib/Downloaded/assetsData.json"));
        assert_eq!(paths.index, PathBuf::from("/lib/Downloaded/.msx/index.json"));
        assert_eq!(paths.hash, PathBuf::from("/lib/Downloaded/.msx/manifest.sha256"));
    }

    #[test]
    fn redirected_cache() {
        let paths = LibraryPaths::new("/lib").with_cache_dir("/tmp/cache");
        assert_eq!(paths.index, PathBuf::from("/tmp/cache/index.json"));
        assert_eq!(paths.hash, PathBuf::from("/tmp/cache/manifest.sha256"));
        assert_eq!(paths.manifest, PathBuf::from("/lib/Downloaded/assetsData.json"));
    }
}
