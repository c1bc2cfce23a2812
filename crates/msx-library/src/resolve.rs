//! Per-asset resolution
//!
//! Turns a manifest entry plus its sidecar into an [`AssetRecord`]. Each
//! declared type has an [`AssetResolver`]; only files that exist on disk make
//! it into the record.

use crate::error::ResolveError;
use crate::key::AssetType;
use crate::lod::{model_lod, plant_lod};
use crate::manifest::ManifestEntry;
use crate::record::{AssetRecord, LodMap, TextureChannel, TextureSet};
use crate::sidecar::{Component, MeshEntry, Sidecar, TextureMap};
use std::collections::BTreeSet;
use std::path::Path;

/// Meshes grouped by LOD plus the set of extensions seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMeshes {
    /// LOD label → files
    pub lods: LodMap,
    /// File extensions, sorted and unique
    pub formats: BTreeSet<String>,
}

impl ResolvedMeshes {
    fn add(&mut self, lod: String, file: &Path) {
        if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
            self.formats.insert(ext.to_string());
        }
        self.lods.entry(lod).or_default().push(slash(file));
    }
}

/// Type-specific resolution of textures and meshes
pub trait AssetResolver: Send + Sync {
    /// Texture channels whose files exist under `asset_dir`
    fn textures(&self, asset_dir: &Path, sidecar: &Sidecar) -> TextureSet;

    /// Existing mesh files grouped by LOD
    fn meshes(&self, asset_dir: &Path, sidecar: &Sidecar) -> ResolvedMeshes;
}

/// Resolver for `"3d"` assets
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelResolver;

/// Resolver for `"3dplant"` assets
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantResolver;

static MODEL: ModelResolver = ModelResolver;
static PLANT: PlantResolver = PlantResolver;

/// Resolver registered for a declared type
#[must_use]
pub fn resolver_for(asset_type: &AssetType) -> Option<&'static dyn AssetResolver> {
    match asset_type {
        AssetType::Model => Some(&MODEL),
        AssetType::Plant => Some(&PLANT),
        AssetType::Other(_) => None,
    }
}

impl AssetResolver for ModelResolver {
    fn textures(&self, asset_dir: &Path, sidecar: &Sidecar) -> TextureSet {
        let from_maps = textures_from_maps(asset_dir, &sidecar.maps);
        if !from_maps.is_empty() {
            return from_maps;
        }
        textures_from_components(asset_dir, &sidecar.components)
    }

    fn meshes(&self, asset_dir: &Path, sidecar: &Sidecar) -> ResolvedMeshes {
        collect_meshes(asset_dir, sidecar.model_meshes(), model_lod)
    }
}

impl AssetResolver for PlantResolver {
    fn textures(&self, asset_dir: &Path, sidecar: &Sidecar) -> TextureSet {
        textures_from_maps(asset_dir, &sidecar.maps)
    }

    fn meshes(&self, asset_dir: &Path, sidecar: &Sidecar) -> ResolvedMeshes {
        collect_meshes(asset_dir, &sidecar.models, plant_lod)
    }
}

/// Resolve one manifest entry against the `Downloaded` folder
///
/// # Errors
/// Returns error if the type has no resolver or the sidecar is missing or
/// malformed
pub fn resolve_asset(entry: &ManifestEntry, downloaded: &Path) -> Result<AssetRecord, ResolveError> {
    let resolver = resolver_for(&entry.asset_type)
        .ok_or_else(|| ResolveError::UnsupportedType(entry.asset_type.to_string()))?;

    let asset_dir = entry.asset_dir(downloaded);
    let sidecar = Sidecar::load(&asset_dir.join(format!("{}.json", entry.id)))?;

    let textures = resolver.textures(&asset_dir, &sidecar);
    let meshes = resolver.meshes(&asset_dir, &sidecar);
    tracing::debug!(
        "Resolved {}: {} LODs, {} texture channels",
        entry.id,
        meshes.lods.len(),
        textures.len()
    );

    Ok(AssetRecord {
        name: entry.key().name().to_string(),
        id: entry.id.clone(),
        path: slash(&asset_dir),
        asset_type: entry.asset_type.clone(),
        formats: meshes.formats.into_iter().collect(),
        lods: meshes.lods,
        textures,
        preview: entry.preview.last().map(|p| slash(&asset_dir.join(p))),
        tags: entry.tags.clone(),
    })
}

fn textures_from_maps(asset_dir: &Path, maps: &[TextureMap]) -> TextureSet {
    let mut set = TextureSet::new();
    for map in maps {
        let file = asset_dir.join(&map.uri);
        if map.uri.is_empty() || !file.is_file() {
            continue;
        }
        set.entry(map.name.clone())
            .or_insert_with(|| TextureChannel::new(&map.map_type, &map.color_space))
            .push(&map.resolution, slash(&file));
    }
    set
}

fn textures_from_components(asset_dir: &Path, components: &[Component]) -> TextureSet {
    let mut set = TextureSet::new();
    for component in components {
        let mut channel = TextureChannel::new(&component.component_type, &component.color_space);
        for bucket in component.uris.iter().flat_map(|u| &u.resolutions) {
            let files: Vec<String> = bucket
                .formats
                .iter()
                .filter(|f| !f.uri.is_empty())
                .map(|f| asset_dir.join(&f.uri))
                .filter(|p| p.is_file())
                .map(|p| slash(&p))
                .collect();
            if !files.is_empty() {
                channel.resolution.insert(bucket.resolution.clone(), files);
            }
        }
        if !channel.resolution.is_empty() {
            set.insert(component.name.clone(), channel);
        }
    }
    set
}

fn collect_meshes(
    asset_dir: &Path,
    entries: &[MeshEntry],
    label: fn(&str) -> Option<String>,
) -> ResolvedMeshes {
    let mut out = ResolvedMeshes::default();
    for uri in entries.iter().flat_map(MeshEntry::file_uris) {
        let file = asset_dir.join(uri);
        if !file.is_file() {
            continue;
        }
        if let Some(lod) = label(uri) {
            out.add(lod, &file);
        }
    }
    out
}

/// Forward-slash string form of a path
pub(crate) fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
