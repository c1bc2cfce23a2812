//! Normalized per-asset record
//!
//! The uniform `{textures, lods, formats}` shape every asset type resolves
//! to. Field names on the wire match the index files the host layer reads.

use crate::key::AssetType;
use crate::lod::lod_rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// LOD label → mesh file paths
pub type LodMap = BTreeMap<String, Vec<String>>;

/// Channel name → texture files
pub type TextureSet = BTreeMap<String, TextureChannel>;

/// Files of one texture channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureChannel {
    /// Declared map type
    #[serde(rename = "type")]
    pub map_type: String,
    /// Color space
    #[serde(rename = "colorSpace")]
    pub color_space: String,
    /// Resolution label → file paths
    pub resolution: BTreeMap<String, Vec<String>>,
}

impl TextureChannel {
    /// Empty channel
    #[must_use]
    pub fn new(map_type: impl Into<String>, color_space: impl Into<String>) -> Self {
        Self {
            map_type: map_type.into(),
            color_space: color_space.into(),
            resolution: BTreeMap::new(),
        }
    }

    /// Append a file under a resolution
    pub fn push(&mut self, resolution: impl Into<String>, path: String) {
        self.resolution.entry(resolution.into()).or_default().push(path);
    }

    /// Files at `resolution`, if any
    #[must_use]
    pub fn files_at(&self, resolution: &str) -> Option<&[String]> {
        self.resolution.get(resolution).map(Vec::as_slice)
    }
}

/// Fully resolved asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Normalized name
    pub name: String,
    /// Asset id
    pub id: String,
    /// Asset directory
    pub path: String,
    /// Declared type
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Mesh file extensions present on disk, sorted
    pub formats: Vec<String>,
    /// Mesh files per LOD
    pub lods: LodMap,
    /// Texture files per channel
    pub textures: TextureSet,
    /// Preview image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Tags from the manifest
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AssetRecord {
    /// LOD labels ordered `HIGH`, `LOD0`, `LOD1`, ...
    #[must_use]
    pub fn lod_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.lods.keys().map(String::as_str).collect();
        labels.sort_by_key(|l| lod_rank(l));
        labels
    }

    /// Every resolution offered by at least one texture channel
    #[must_use]
    pub fn resolutions(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self
            .textures
            .values()
            .flat_map(|c| c.resolution.keys().map(String::as_str))
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// `{name}_{id}`, the name the host gives the built asset
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}_{}", self.name, self.id)
    }
}
