//! Root library manifest
//!
//! The desktop app keeps one JSON array describing every downloaded asset.
//! The raw document is kept next to the typed entries so the cache can hash
//! exactly what was read without touching the file twice. Entries decode one
//! at a time; an entry of the wrong shape is set aside as rejected and the
//! rest of the manifest stays usable.

use crate::error::ManifestError;
use crate::key::{AssetKey, AssetType};
use msx_hash::ContentHash;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// One downloaded asset as listed in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Asset id
    pub id: String,
    /// Display name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Directory segments below `Downloaded/`
    #[serde(default)]
    pub path: Vec<String>,
    /// Preview image file names; the last one is used
    #[serde(default)]
    pub preview: Vec<String>,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ManifestEntry {
    /// Index key for this entry
    #[must_use]
    pub fn key(&self) -> AssetKey {
        AssetKey::new(self.asset_type.clone(), &self.name, self.id.clone())
    }

    /// Asset directory below the `Downloaded` folder
    #[must_use]
    pub fn asset_dir(&self, downloaded: &Path) -> PathBuf {
        downloaded.join(self.path.join("/"))
    }
}

/// A manifest entry that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Zero-based position in the manifest array
    pub position: usize,
    /// `type::name::id` when those fields are strings, otherwise `entry N`
    pub label: String,
    /// Decoder message
    pub reason: String,
}

impl RejectedEntry {
    fn new(position: usize, value: &Value, err: &serde_json::Error) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str);
        let label = match (field("type"), field("name"), field("id")) {
            (Some(kind), Some(name), Some(id)) => {
                AssetKey::new(AssetType::from(kind), name, id).to_string()
            }
            _ => format!("entry {position}"),
        };
        Self {
            position,
            label,
            reason: err.to_string(),
        }
    }
}

/// Parsed manifest plus the document it came from
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    raw: Value,
    entries: Vec<ManifestEntry>,
    rejected: Vec<RejectedEntry>,
}

impl Manifest {
    /// Read and parse a manifest file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not an entry array
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse manifest text; `path` is only used for error reporting
    ///
    /// # Errors
    /// Returns error if the text is not a JSON array
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let malformed = |source| ManifestError::Malformed {
            path: path.clone(),
            source,
        };
        let raw: Value = serde_json::from_str(text).map_err(malformed)?;
        let items: Vec<Value> = serde_json::from_value(raw.clone()).map_err(malformed)?;

        let mut entries = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();
        for (position, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<ManifestEntry>(item.clone()) {
                Ok(entry) => entries.push(entry),
                Err(err) => rejected.push(RejectedEntry::new(position, &item, &err)),
            }
        }

        tracing::debug!(
            "Loaded manifest {} with {} entries ({} rejected)",
            path.display(),
            entries.len(),
            rejected.len()
        );
        Ok(Self {
            path,
            raw,
            entries,
            rejected,
        })
    }

    /// Canonical content hash of the manifest document
    #[must_use]
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_json(&self.raw)
    }

    /// Source path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed entries in file order
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entries that did not decode, in file order
    #[must_use]
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    /// Error for the first rejected entry, if any
    #[must_use]
    pub fn first_rejection(&self) -> Option<ManifestError> {
        self.rejected.first().map(|r| ManifestError::Entry {
            path: self.path.clone(),
            label: r.label.clone(),
            reason: r.reason.clone(),
        })
    }

    /// Number of decoded entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the manifest lists no assets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash a manifest file without building entries
///
/// # Errors
/// Returns error if the file cannot be read or is not JSON
pub fn hash_manifest_file(path: &Path) -> Result<ContentHash, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_json::from_str(&text).map_err(|source| ManifestError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ContentHash::of_json(&raw))
}
