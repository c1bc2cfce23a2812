use crate::error::PlanError;
use crate::index::LibraryIndex;
use crate::plan::Selection;
use crate::record::AssetRecord;
use serde::Serialize;

/// Geometry loader settings for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeometryPlan {
    /// Index label of the asset
    pub asset: String,
    /// `{name}_{id}`
    pub asset_name: String,
    /// LOD the render files come from
    pub render_lod: String,
    /// Render geometry files
    pub render_files: Vec<String>,
    /// LOD the proxy files come from
    pub proxy_lod: String,
    /// Proxy geometry files
    pub proxy_files: Vec<String>,
    /// 0 routes through the Alembic loader, 1 through the generic one
    pub format_switch: u8,
}

/// Plan geometry loading for the selected asset
///
/// # Errors
/// Returns error if the asset or either LOD is unknown
pub fn plan_geometry(index: &LibraryIndex, selection: &Selection) -> Result<GeometryPlan, PlanError> {
    let (key, record) = index.lookup(&selection.asset)?;
    let render_lod = selection.effective_render_lod();

    let render_files = files_for(key, record, render_lod, &selection.file_format)?;
    let proxy_files = files_for(key, record, &selection.proxy_lod, &selection.file_format)?;
    if render_files.is_empty() {
        tracing::warn!(
            "{key} has no .{} files at {render_lod}",
            selection.file_format
        );
    }

    Ok(GeometryPlan {
        asset: key.to_string(),
        asset_name: record.display_name(),
        render_lod: render_lod.to_string(),
        render_files,
        proxy_lod: selection.proxy_lod.clone(),
        proxy_files,
        format_switch: u8::from(selection.file_format != "abc"),
    })
}

fn files_for(key: &str, record: &AssetRecord, lod: &str, format: &str) -> Result<Vec<String>, PlanError> {
    let files = record.lods.get(lod).ok_or_else(|| PlanError::UnknownLod {
        asset: key.to_string(),
        lod: lod.to_string(),
        available: record.lod_labels().join(", "),
    })?;
    let suffix = format!(".{format}");
    Ok(files.iter().filter(|f| f.ends_with(&suffix)).cloned().collect())
}
