//! Per-asset metadata sidecar (`<asset dir>/<id>.json`)
//!
//! Sidecars come in several generations; every field is optional and unknown
//! fields are ignored.

use crate::error::ResolveError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Decoded sidecar
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Sidecar {
    /// Flat texture map list
    pub maps: Vec<TextureMap>,
    /// Component-style texture list (older model sidecars)
    pub components: Vec<Component>,
    /// Mesh list (newer model sidecars)
    pub meshes: Vec<MeshEntry>,
    /// Model list (plants and older model sidecars)
    pub models: Vec<MeshEntry>,
}

/// One texture file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextureMap {
    /// Channel name (`Albedo`, `Normal`, ...)
    pub name: String,
    /// File path relative to the asset dir
    pub uri: String,
    /// Resolution label (`2048x2048`)
    pub resolution: String,
    /// Declared map type
    #[serde(rename = "type")]
    pub map_type: String,
    /// Color space (`sRGB`, `Linear`)
    #[serde(rename = "colorSpace")]
    pub color_space: String,
}

/// Texture channel with files grouped by resolution
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Component {
    /// Channel name
    pub name: String,
    /// Declared map type
    #[serde(rename = "type")]
    pub component_type: String,
    /// Color space
    #[serde(rename = "colorSpace")]
    pub color_space: String,
    /// File groups
    pub uris: Vec<ComponentUri>,
}

/// Resolution buckets of a component
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentUri {
    /// Buckets
    pub resolutions: Vec<ComponentResolution>,
}

/// Files of a component at one resolution
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentResolution {
    /// Resolution label
    pub resolution: String,
    /// One entry per file format
    pub formats: Vec<UriRef>,
}

/// Bare `{ "uri": ... }` object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UriRef {
    /// File path relative to the asset dir
    pub uri: String,
}

/// Mesh or model entry; either a single `uri` or a `uris` list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeshEntry {
    /// Single file
    pub uri: Option<String>,
    /// Several files (formats / LODs)
    pub uris: Vec<UriRef>,
}

impl MeshEntry {
    /// File URIs of this entry; `uris` wins over `uri` when non-empty
    pub fn file_uris(&self) -> Vec<&str> {
        if self.uris.is_empty() {
            self.uri.as_deref().into_iter().collect()
        } else {
            self.uris.iter().map(|u| u.uri.as_str()).collect()
        }
    }
}

impl Sidecar {
    /// Read and decode a sidecar
    ///
    /// # Errors
    /// Returns [`ResolveError::MissingSidecar`] if the file is absent, or an
    /// IO/decode error
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        if !path.is_file() {
            return Err(ResolveError::MissingSidecar(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ResolveError::Sidecar {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Model mesh list: `meshes` when non-empty, else `models`
    #[must_use]
    pub fn model_meshes(&self) -> &[MeshEntry] {
        if self.meshes.is_empty() {
            &self.models
        } else {
            &self.meshes
        }
    }
}
