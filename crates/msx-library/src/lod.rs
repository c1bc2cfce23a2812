//! LOD labels derived from mesh file names

use once_cell::sync::Lazy;
use regex::Regex;

/// Label of the unreduced source mesh
pub const HIGH: &str = "HIGH";

static MODEL_LOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(high|lod\d)").expect("static LOD pattern"));

/// LOD of a model mesh: first `high`/`lodN` anywhere in the URI, uppercased
///
/// `"rock_LOD1.fbx"` → `LOD1`, `"Rock_High.abc"` → `HIGH`
#[must_use]
pub fn model_lod(uri: &str) -> Option<String> {
    let lower = uri.to_lowercase();
    MODEL_LOD.find(&lower).map(|m| m.as_str().to_uppercase())
}

/// LOD of a plant model: the last `_` segment up to its first `.`, uppercased
///
/// `"Var1/Var1_LOD3.fbx"` → `LOD3`
#[must_use]
pub fn plant_lod(uri: &str) -> Option<String> {
    let (_, tail) = uri.rsplit_once('_')?;
    let label = tail.split('.').next().unwrap_or(tail).to_uppercase();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// Sort key placing `HIGH` first, then `LOD0`, `LOD1`, ..., then the rest
#[must_use]
pub fn lod_rank(label: &str) -> (u8, u32, String) {
    if label == HIGH {
        return (0, 0, String::new());
    }
    match label.strip_prefix("LOD").and_then(|n| n.parse::<u32>().ok()) {
        Some(n) => (1, n, String::new()),
        None => (2, 0, label.to_string()),
    }
}
