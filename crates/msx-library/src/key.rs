//! Asset identity
//!
//! [`AssetKey`] is the composite `type::name::id` label under which an asset
//! is indexed. The same string is what the host shows in its asset menu.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between key segments
pub const KEY_SEPARATOR: &str = "::";

/// Declared asset category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    /// Scanned or modelled object (`"3d"`)
    Model,
    /// Vegetation with per-variation models (`"3dplant"`)
    Plant,
    /// Any other declared type (surfaces, decals, ...)
    Other(String),
}

impl AssetType {
    /// Declared type string
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "3d",
            Self::Plant => "3dplant",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AssetType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "3d" => Self::Model,
            "3dplant" => Self::Plant,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for AssetType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<AssetType> for String {
    fn from(t: AssetType) -> Self {
        t.as_str().to_string()
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse whitespace runs in a display name into single underscores
///
/// `"Mossy  Rock\tLarge"` → `"Mossy_Rock_Large"`
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Composite index key: `type::name::id`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetKey {
    asset_type: AssetType,
    name: String,
    id: String,
}

impl AssetKey {
    /// Build a key, normalizing the display name
    #[must_use]
    pub fn new(asset_type: AssetType, name: &str, id: impl Into<String>) -> Self {
        Self {
            asset_type,
            name: normalize_name(name),
            id: id.into(),
        }
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn asset_type(&self) -> &AssetType {
        &self.asset_type
    }

    /// Normalized name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asset id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.asset_type, self.name, self.id
        )
    }
}

impl FromStr for AssetKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        match segments.as_slice() {
            [t, name, id] if !t.is_empty() && !name.is_empty() && !id.is_empty() => Ok(Self {
                asset_type: AssetType::from(*t),
                name: (*name).to_string(),
                id: (*id).to_string(),
            }),
            _ => Err(KeyError(s.to_string())),
        }
    }
}

/// Last `::` segment of a menu label, i.e. the asset id
#[must_use]
pub fn id_of_label(label: &str) -> &str {
    label.rsplit(KEY_SEPARATOR).next().unwrap_or(label)
}

/// Malformed key string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid asset key '{0}': expected type::name::id")]
pub struct KeyError(pub String);
