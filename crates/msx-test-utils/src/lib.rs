//! Testing utilities for msx workspace
//!
//! On-disk asset library fixtures: a temp directory laid out like a
//! downloaded library, with a root manifest, per-asset sidecars and empty
//! placeholder files for every mesh and texture that should "exist".

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One asset to install into a [`LibraryFixture`]
#[derive(Debug, Clone)]
pub struct AssetSpec {
    pub asset_type: String,
    pub id: String,
    pub name: String,
    pub path: Vec<String>,
    pub preview: Vec<String>,
    pub tags: Vec<String>,
    pub sidecar: Option<Value>,
    /// Files created inside the asset directory
    pub files: Vec<String>,
}

impl AssetSpec {
    pub fn new(asset_type: &str, id: &str, name: &str) -> Self {
        let folder = format!("{}_{id}", name.to_lowercase().replace(' ', "_"));
        Self {
            asset_type: asset_type.to_string(),
            id: id.to_string(),
            name: name.to_string(),
            path: vec![asset_type.to_string(), folder],
            preview: Vec::new(),
            tags: Vec::new(),
            sidecar: Some(json!({})),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sidecar(mut self, sidecar: Value) -> Self {
        self.sidecar = Some(sidecar);
        self
    }

    #[must_use]
    pub fn without_sidecar(mut self) -> Self {
        self.sidecar = None;
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files.extend(files.iter().map(|f| (*f).to_string()));
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_preview(mut self, preview: &[&str]) -> Self {
        self.preview = preview.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Manifest entry as the desktop app writes it
    pub fn manifest_entry(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "type": self.asset_type,
            "path": self.path,
            "preview": self.preview,
            "tags": self.tags,
        })
    }
}

/// A rock-like `3d` asset with meshes, texture maps and one dangling URI
/// per category.
pub fn sample_model(id: &str, name: &str) -> AssetSpec {
    let sidecar = json!({
        "id": id,
        "meshes": [
            { "type": "original", "uris": [{ "uri": format!("{id}_High.fbx") }] },
            { "type": "lod", "uris": [
                { "uri": format!("{id}_LOD0.fbx") },
                { "uri": format!("{id}_LOD0.abc") }
            ] },
            { "type": "lod", "uri": format!("{id}_LOD1.fbx") },
            { "type": "lod", "uri": format!("{id}_LOD2.fbx") }
        ],
        "maps": [
            { "name": "Albedo", "type": "albedo", "colorSpace": "sRGB", "resolution": "2048x2048", "uri": format!("{id}_2K_Albedo.jpg") },
            { "name": "Albedo", "type": "albedo", "colorSpace": "sRGB", "resolution": "4096x4096", "uri": format!("{id}_4K_Albedo.jpg") },
            { "name": "Roughness", "type": "roughness", "colorSpace": "Linear", "resolution": "2048x2048", "uri": format!("{id}_2K_Roughness.jpg") },
            { "name": "Normal", "type": "normal", "colorSpace": "Linear", "resolution": "2048x2048", "uri": format!("{id}_2K_Normal.jpg") },
            { "name": "Normal", "type": "normal", "colorSpace": "Linear", "resolution": "2048x2048", "uri": format!("{id}_2K_Normal_LOD0.jpg") },
            { "name": "Displacement", "type": "displacement", "colorSpace": "Linear", "resolution": "2048x2048", "uri": format!("{id}_2K_Displacement.exr") }
        ]
    });
    AssetSpec::new("3d", id, name)
        .with_sidecar(sidecar)
        .with_files(&[
            &format!("{id}_High.fbx"),
            &format!("{id}_LOD0.fbx"),
            &format!("{id}_LOD0.abc"),
            &format!("{id}_LOD1.fbx"),
            &format!("{id}_2K_Albedo.jpg"),
            &format!("{id}_4K_Albedo.jpg"),
            &format!("{id}_2K_Roughness.jpg"),
            &format!("{id}_2K_Normal.jpg"),
            &format!("{id}_2K_Normal_LOD0.jpg"),
            &format!("{id}_Preview.png"),
        ])
        .with_preview(&[&format!("{id}_Thumb.png"), &format!("{id}_Preview.png")])
        .with_tags(&["rock", "nature"])
}

/// A `3dplant` asset with two variations and a translucency map.
pub fn sample_plant(id: &str, name: &str) -> AssetSpec {
    let sidecar = json!({
        "id": id,
        "models": [
            { "uri": "Var1/Var1_LOD0.fbx" },
            { "uri": "Var1/Var1_LOD1.fbx" },
            { "uri": "Var2/Var2_LOD0.fbx" },
            { "uri": "Var2/Var2_LOD0.abc" },
            { "uri": "Var2/Var2_LOD1.fbx" }
        ],
        "maps": [
            { "name": "Albedo", "type": "albedo", "colorSpace": "sRGB", "resolution": "2048x2048", "uri": format!("Textures/Atlas/{id}_2K_Albedo.jpg") },
            { "name": "Albedo", "type": "albedo", "colorSpace": "sRGB", "resolution": "4096x4096", "uri": format!("Textures/Atlas/{id}_4K_Albedo.jpg") },
            { "name": "Translucency", "type": "translucency", "colorSpace": "sRGB", "resolution": "2048x2048", "uri": format!("Textures/Atlas/{id}_2K_Translucency.jpg") }
        ]
    });
    AssetSpec::new("3dplant", id, name)
        .with_sidecar(sidecar)
        .with_files(&[
            "Var1/Var1_LOD0.fbx",
            "Var1/Var1_LOD1.fbx",
            "Var2/Var2_LOD0.fbx",
            "Var2/Var2_LOD0.abc",
            &format!("Textures/Atlas/{id}_2K_Albedo.jpg"),
            &format!("Textures/Atlas/{id}_4K_Albedo.jpg"),
            &format!("Textures/Atlas/{id}_2K_Translucency.jpg"),
        ])
        .with_tags(&["plant", "fern"])
}

/// Temp directory shaped like a downloaded asset library
#[derive(Debug)]
pub struct LibraryFixture {
    dir: TempDir,
    entries: Vec<Value>,
}

impl LibraryFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp library");
        fs::create_dir_all(dir.path().join("Downloaded")).expect("create Downloaded");
        Self {
            dir,
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn downloaded(&self) -> PathBuf {
        self.root().join("Downloaded")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.downloaded().join("assetsData.json")
    }

    pub fn asset_dir(&self, spec: &AssetSpec) -> PathBuf {
        self.downloaded().join(spec.path.join("/"))
    }

    /// Create the asset's directory, sidecar and files; queue its manifest entry.
    pub fn install(&mut self, spec: &AssetSpec) -> PathBuf {
        let dir = self.asset_dir(spec);
        fs::create_dir_all(&dir).expect("create asset dir");
        if let Some(sidecar) = &spec.sidecar {
            write_json(&dir.join(format!("{}.json", spec.id)), sidecar);
        }
        for file in &spec.files {
            touch(&dir.join(file));
        }
        self.entries.push(spec.manifest_entry());
        dir
    }

    /// Install several assets and write the manifest
    pub fn with_assets(mut self, specs: &[AssetSpec]) -> Self {
        for spec in specs {
            self.install(spec);
        }
        self.write_manifest();
        self
    }

    pub fn write_manifest(&self) {
        write_json(&self.manifest_path(), &Value::Array(self.entries.clone()));
    }

    /// Overwrite the manifest with arbitrary content
    pub fn write_raw_manifest(&self, text: &str) {
        fs::write(self.manifest_path(), text).expect("write manifest");
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<Value> {
        &mut self.entries
    }

    /// Create an empty file (and parents) relative to the library root
    pub fn touch(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.root().join(relative);
        touch(&path);
        path
    }
}

impl Default for LibraryFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"").expect("touch file");
}

pub fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let text = serde_json::to_string_pretty(value).expect("encode json");
    fs::write(path, text).expect("write json");
}

/// Forward-slash rendering of a path, as stored in the index
pub fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
