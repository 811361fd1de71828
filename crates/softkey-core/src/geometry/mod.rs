//! Key geometry: laid-out keys and the per-keyboard spatial index built from them.

mod index;
mod key;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use index::{proximity_threshold, KeyGeometryIndex, GRID_COLUMNS, GRID_ROWS};
pub use key::{GestureKind, Key, KeyBinding};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("keyboard has no keys")]
    Empty,
    #[error("key {index}: {reason}")]
    InvalidKey { index: usize, reason: String },
    #[error("keyboard TOML parse error: {0}")]
    Parse(String),
}

/// Supplies the keys of a keyboard. Implemented by whatever the layout
/// collaborator produces; the engine only reads geometry through this.
pub trait KeyGeometryProvider {
    fn keys(&self) -> &[Key];
}

impl KeyGeometryProvider for [Key] {
    fn keys(&self) -> &[Key] {
        self
    }
}

impl KeyGeometryProvider for Vec<Key> {
    fn keys(&self) -> &[Key] {
        self
    }
}

/// Plain keyboard description, as read from a `[[keys]]` TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub keys: Vec<Key>,
}

impl KeyboardLayout {
    pub fn from_toml(toml_str: &str) -> Result<Self, GeometryError> {
        toml::from_str(toml_str).map_err(|e| GeometryError::Parse(e.to_string()))
    }
}

impl KeyGeometryProvider for KeyboardLayout {
    fn keys(&self) -> &[Key] {
        &self.keys
    }
}
