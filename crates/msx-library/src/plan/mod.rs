//! Host request planning
//!
//! Turns the index plus the user's current selection into declarative
//! requests for the host layer: which files the geometry loaders read, which
//! texture feeds which shader input, which textures need converting, and
//! which asset ids a batch run covers. The host applies these verbatim.

mod batch;
mod geometry;
mod shader;
mod textures;

pub use batch::batch_ids;
pub use geometry::{plan_geometry, GeometryPlan};
pub use shader::{plan_shader, ShaderBinding, ShaderPlan, ShaderTarget, SURFACE_INPUTS};
pub use textures::{plan_textures, TextureAssignment, TexturePlan, HDR_EXT, NATIVE_EXT};

use serde::{Deserialize, Serialize};

/// Current user choices on the host side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Asset label or id
    pub asset: String,
    /// Mesh extension to load (`fbx`, `abc`, ...)
    pub file_format: String,
    /// LOD for render geometry
    pub render_lod: String,
    /// LOD for proxy geometry
    pub proxy_lod: String,
    /// Texture resolution label
    pub resolution: String,
    /// Load the unreduced `HIGH` mesh for render geometry
    #[serde(default)]
    pub load_original: bool,
}

impl Selection {
    /// Selection for `asset` with common defaults
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            file_format: "fbx".to_string(),
            render_lod: "LOD0".to_string(),
            proxy_lod: "LOD0".to_string(),
            resolution: "2048x2048".to_string(),
            load_original: false,
        }
    }

    /// LOD actually used for render geometry
    #[must_use]
    pub fn effective_render_lod(&self) -> &str {
        if self.load_original {
            crate::lod::HIGH
        } else {
            &self.render_lod
        }
    }
}
