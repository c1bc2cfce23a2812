//! Library scanner
//!
//! Resolves every manifest entry into an [`AssetRecord`] and assembles the
//! [`LibraryIndex`]. Entries are independent, so they resolve in parallel;
//! the index is key-sorted, so scheduling never shows in the output.

use crate::error::{LibraryError, ResolveError};
use crate::index::LibraryIndex;
use crate::manifest::{Manifest, ManifestEntry};
use crate::record::AssetRecord;
use crate::resolve::resolve_asset;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// An entry left out of the index
#[derive(Debug, Clone, Serialize)]
pub struct SkippedAsset {
    /// Label the entry would have had
    pub key: String,
    /// Why it was skipped
    pub reason: String,
}

/// Summary of one scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Entries in the manifest
    pub total: usize,
    /// Entries resolved into the index
    pub resolved: usize,
    /// Entries left out
    pub skipped: Vec<SkippedAsset>,
    /// Labels listed more than once (the later entry wins)
    pub duplicates: Vec<String>,
}

/// Builds an index from a manifest
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    downloaded: PathBuf,
    strict: bool,
}

impl LibraryScanner {
    /// Scanner resolving asset paths under `downloaded`
    #[must_use]
    pub fn new(downloaded: impl Into<PathBuf>) -> Self {
        Self {
            downloaded: downloaded.into(),
            strict: false,
        }
    }

    /// Fail on the first unresolvable entry instead of skipping it
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve every entry of `manifest`
    ///
    /// Manifest entries that did not decode are skipped like unresolvable ones.
    ///
    /// # Errors
    /// In strict mode, returns the first undecodable entry, or else the first
    /// resolution failure in manifest order
    pub fn scan(&self, manifest: &Manifest) -> Result<(LibraryIndex, ScanReport), LibraryError> {
        if self.strict {
            if let Some(err) = manifest.first_rejection() {
                return Err(err.into());
            }
        }

        let results: Vec<(String, Result<AssetRecord, ResolveError>)> = manifest
            .entries()
            .par_iter()
            .map(|entry: &ManifestEntry| {
                (entry.key().to_string(), resolve_asset(entry, &self.downloaded))
            })
            .collect();

        let mut index = LibraryIndex::new();
        let mut report = ScanReport {
            total: results.len() + manifest.rejected().len(),
            ..ScanReport::default()
        };

        for rejected in manifest.rejected() {
            tracing::warn!("Skipping {}: {}", rejected.label, rejected.reason);
            report.skipped.push(SkippedAsset {
                key: rejected.label.clone(),
                reason: rejected.reason.clone(),
            });
        }

        for (key, result) in results {
            match result {
                Ok(record) => {
                    if index.insert(key.clone(), record).is_some() {
                        tracing::warn!("Duplicate asset {key} in manifest, keeping the later entry");
                        report.duplicates.push(key);
                    } else {
                        report.resolved += 1;
                    }
                }
                Err(err) if self.strict => return Err(err.into()),
                Err(err) => {
                    tracing::warn!("Skipping {key}: {err}");
                    report.skipped.push(SkippedAsset {
                        key,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Scanned {} assets: {} resolved, {} skipped",
            report.total,
            report.resolved,
            report.skipped.len()
        );
        Ok((index, report))
    }
}
