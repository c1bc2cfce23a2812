//! Normalized library index
//!
//! Key-sorted map from `type::name::id` labels to resolved records. This is
//! the document persisted by the cache and read by the host layer.

use crate::error::PlanError;
use crate::key::{id_of_label, AssetType};
use crate::record::AssetRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved records keyed by asset label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryIndex {
    assets: BTreeMap<String, AssetRecord>,
}

impl LibraryIndex {
    /// Empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, key: String, record: AssetRecord) -> Option<AssetRecord> {
        self.assets.insert(key, record)
    }

    /// Record by exact label
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AssetRecord> {
        self.assets.get(key)
    }

    /// First record whose label ends in `id` (case-insensitive)
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<(&str, &AssetRecord)> {
        self.assets
            .iter()
            .find(|(key, _)| id_of_label(key).eq_ignore_ascii_case(id))
            .map(|(k, r)| (k.as_str(), r))
    }

    /// Look up by exact label, falling back to id
    ///
    /// # Errors
    /// Returns [`PlanError::UnknownAsset`] if neither matches
    pub fn lookup(&self, key_or_id: &str) -> Result<(&str, &AssetRecord), PlanError> {
        if let Some((k, r)) = self.assets.get_key_value(key_or_id) {
            return Ok((k.as_str(), r));
        }
        self.find_by_id(key_or_id)
            .ok_or_else(|| PlanError::UnknownAsset(key_or_id.to_string()))
    }

    /// Existing directory of an asset
    ///
    /// # Errors
    /// Returns error if the asset is unknown or its directory is gone
    pub fn asset_dir(&self, key_or_id: &str) -> Result<PathBuf, PlanError> {
        let (_, record) = self.lookup(key_or_id)?;
        let dir = PathBuf::from(&record.path);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(PlanError::MissingDirectory(dir))
        }
    }

    /// Labels in index order (the host's asset menu)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// Entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetRecord)> {
        self.assets.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Entries of `asset_type` carrying `tag` (case-insensitive); `None`
    /// matches everything
    pub fn filter<'a>(
        &'a self,
        asset_type: Option<&'a AssetType>,
        tag: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a str, &'a AssetRecord)> {
        self.iter().filter(move |(_, r)| {
            asset_type.map_or(true, |t| &r.asset_type == t)
                && tag.map_or(true, |tag| r.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        })
    }

    /// Number of assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True if no assets are indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Pretty JSON (4-space indent) as written to disk
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }

    /// Whether every indexed asset path lies under `root`
    ///
    /// Compared by path component, so `/lib/Downloaded2` is not under
    /// `/lib/Downloaded`.
    #[must_use]
    pub fn all_under(&self, root: &Path) -> bool {
        self.assets.values().all(|r| Path::new(&r.path).starts_with(root))
    }
}

impl FromIterator<(String, AssetRecord)> for LibraryIndex {
    fn from_iter<I: IntoIterator<Item = (String, AssetRecord)>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LodMap;
    use std::collections::BTreeMap;

    fn record(id: &str, asset_type: AssetType, path: &str, tags: &[&str]) -> AssetRecord {
        AssetRecord {
            name: "N".into(),
            id: id.into(),
            path: path.into(),
            asset_type,
            formats: Vec::new(),
            lods: LodMap::new(),
            textures: BTreeMap::new(),
            preview: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    fn index() -> LibraryIndex {
        [
            ("3d::Rock::abc12".to_string(), record("abc12", AssetType::Model, "/lib/Downloaded/3d/rock", &["rock"])),
            ("3dplant::Fern::Xy9".to_string(), record("Xy9", AssetType::Plant, "/lib/Downloaded/3dplant/fern", &["Plant"])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn keys_are_sorted() {
        assert_eq!(index().keys().collect::<Vec<_>>(), vec!["3d::Rock::abc12", "3dplant::Fern::Xy9"]);
    }

    #[test]
    fn find_by_id_ignores_case() {
        let index = index();
        let (key, _) = index.find_by_id("xy9").unwrap();
        assert_eq!(key, "3dplant::Fern::Xy9");
        assert!(index.find_by_id("zzz").is_none());
    }

    #[test]
    fn lookup_accepts_key_or_id() {
        let index = index();
        assert_eq!(index.lookup("3d::Rock::abc12").unwrap().1.id, "abc12");
        assert_eq!(index.lookup("abc12").unwrap().0, "3d::Rock::abc12");
        assert!(matches!(index.lookup("nope"), Err(PlanError::UnknownAsset(_))));
    }

    #[test]
    fn asset_dir_requires_directory() {
        let index = index();
        assert!(matches!(
            index.asset_dir("abc12"),
            Err(PlanError::MissingDirectory(_))
        ));
    }

    #[test]
    fn filters() {
        let index = index();
        assert_eq!(index.filter(None, None).count(), 2);
        assert_eq!(index.filter(Some(&AssetType::Plant), None).count(), 1);
        assert_eq!(index.filter(None, Some("plant")).count(), 1);
        assert_eq!(index.filter(None, Some("ROCK")).count(), 1);
        assert_eq!(index.filter(Some(&AssetType::Plant), Some("rock")).count(), 0);
    }

    #[test]
    fn serializes_as_flat_object_with_four_space_indent() {
        let text = String::from_utf8(index().to_pretty_json().unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"3d::Rock::abc12\": {\n        \"name\""));
        let back: LibraryIndex = serde_json::from_str(&text).unwrap();
        assert_eq!(back, index());
    }

    #[test]
    fn root_containment() {
        assert!(index().all_under(Path::new("/lib")));
        assert!(!index().all_under(Path::new("/other")));
        assert!(index().all_under(Path::new("/lib/Downloaded")));
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_under_root() {
        let index: LibraryIndex = [(
            "3d::Rock::abc12".to_string(),
            record("abc12", AssetType::Model, "/lib/Downloaded2/3d/rock", &[]),
        )]
        .into_iter()
        .collect();
        assert!(!index.all_under(Path::new("/lib/Downloaded")));
        assert!(index.all_under(Path::new("/lib/Downloaded2")));
    }
}
