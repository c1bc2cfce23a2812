//! Entry point tying configuration, cache and scanner together

use crate::cache::{CacheOutcome, CacheState, IndexCache};
use crate::config::MsxConfig;
use crate::error::LibraryError;
use crate::paths::LibraryPaths;
use crate::scanner::LibraryScanner;

/// A configured asset library
#[derive(Debug, Clone)]
pub struct Library {
    cache: IndexCache,
    scanner: LibraryScanner,
}

impl Library {
    /// Open the library described by `config`
    ///
    /// # Errors
    /// Returns error if no library path is configured
    pub fn open(config: &MsxConfig) -> Result<Self, LibraryError> {
        let paths = config.paths()?;
        Ok(Self::with_paths(paths, config.strict))
    }

    /// Open a library with an explicit layout
    #[must_use]
    pub fn with_paths(paths: LibraryPaths, strict: bool) -> Self {
        let scanner = LibraryScanner::new(&paths.downloaded).strict(strict);
        Self {
            cache: IndexCache::new(paths),
            scanner,
        }
    }

    /// Library layout
    #[must_use]
    pub fn paths(&self) -> &LibraryPaths {
        self.cache.paths()
    }

    /// Current index, rebuilt only if the manifest changed
    ///
    /// # Errors
    /// See [`IndexCache::load_or_build`]
    pub fn index(&self) -> Result<CacheOutcome, LibraryError> {
        self.cache.load_or_build(&self.scanner)
    }

    /// Rebuild the index unconditionally
    ///
    /// # Errors
    /// See [`IndexCache::rebuild`]
    pub fn rebuild(&self) -> Result<CacheOutcome, LibraryError> {
        self.cache.rebuild(&self.scanner)
    }

    /// Cache diagnostics
    #[must_use]
    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    /// Drop the persisted index
    ///
    /// # Errors
    /// Returns error if cache files cannot be removed
    pub fn clear_cache(&self) -> Result<(), LibraryError> {
        Ok(self.cache.clear()?)
    }
}
