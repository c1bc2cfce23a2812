use crate::error::PlanError;
use crate::index::LibraryIndex;
use crate::plan::Selection;
use serde::Serialize;
use std::path::Path;

/// Renderer-native texture extension produced by conversion
pub const NATIVE_EXT: &str = "rat";
/// High-precision source preferred over 8-bit files when present
pub const HDR_EXT: &str = "exr";

/// One texture file chosen for a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureAssignment {
    /// Channel name as in the index (`Albedo`, `Normal`, ...)
    pub channel: String,
    /// Chosen file
    pub path: String,
}

/// Texture choices for one asset at one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TexturePlan {
    /// Index label of the asset
    pub asset: String,
    /// Requested resolution
    pub resolution: String,
    /// File each channel should read
    pub assignments: Vec<TextureAssignment>,
    /// Files lacking a converted sibling; the host converts these
    pub to_generate: Vec<TextureAssignment>,
    /// Channels with no file at the requested resolution
    pub missing: Vec<String>,
}

/// Choose one file per texture channel
///
/// Within a channel's files at the selected resolution, the first whose path
/// mentions the render LOD wins, else the first file. An existing `.exr`
/// sibling replaces it; an existing `.rat` sibling replaces that, otherwise
/// the file is queued for conversion.
///
/// # Errors
/// Returns error if the asset is unknown
pub fn plan_textures(index: &LibraryIndex, selection: &Selection) -> Result<TexturePlan, PlanError> {
    let (key, record) = index.lookup(&selection.asset)?;
    let mut plan = TexturePlan {
        asset: key.to_string(),
        resolution: selection.resolution.clone(),
        ..TexturePlan::default()
    };

    for (channel, textures) in &record.textures {
        let Some(candidates) = textures.files_at(&selection.resolution).filter(|f| !f.is_empty()) else {
            tracing::debug!("{key}: {channel} has no {} files", selection.resolution);
            plan.missing.push(channel.clone());
            continue;
        };

        let mut chosen = candidates
            .iter()
            .find(|f| f.contains(selection.render_lod.as_str()))
            .unwrap_or(&candidates[0])
            .clone();

        if let Some(hdr) = existing_sibling(&chosen, HDR_EXT) {
            chosen = hdr;
        }
        match existing_sibling(&chosen, NATIVE_EXT) {
            Some(native) => chosen = native,
            None => plan.to_generate.push(TextureAssignment {
                channel: channel.clone(),
                path: chosen.clone(),
            }),
        }

        plan.assignments.push(TextureAssignment {
            channel: channel.clone(),
            path: chosen,
        });
    }
    Ok(plan)
}

fn existing_sibling(file: &str, ext: &str) -> Option<String> {
    let sibling = Path::new(file).with_extension(ext);
    if sibling.is_file() {
        Some(sibling.to_string_lossy().replace('\\', "/"))
    } else {
        None
    }
}
