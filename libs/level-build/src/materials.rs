//! # Material Library
//!
//! Named materials of a scene. Faces reference materials indirectly, through
//! the slot tables of shapes and rooms.

use config::constants::{DEFAULT_COLOR, REMOVE_MATERIAL_COLOR};
use serde::{Deserialize, Serialize};

/// A named material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique name
    pub name: String,
    /// Display colour (RGBA)
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Never reclaimed, even without users
    #[serde(default)]
    pub protected: bool,
}

fn default_color() -> [f32; 4] {
    DEFAULT_COLOR
}

impl Material {
    /// Creates an unprotected material with the default colour.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_COLOR,
            protected: false,
        }
    }
}

/// Ordered set of materials, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns true if the library holds no material.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Looks a material up by name.
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Returns true if a material with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over all materials.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Adds a material, replacing one with the same name.
    pub fn insert(&mut self, material: Material) {
        match self.materials.iter_mut().find(|m| m.name == material.name) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
    }

    /// Makes sure the sentinel remove-material exists and is protected.
    ///
    /// Returns true if the material had to be created.
    pub fn ensure_remove_material(&mut self, name: &str) -> bool {
        if let Some(existing) = self.materials.iter_mut().find(|m| m.name == name) {
            existing.protected = true;
            return false;
        }
        log::info!("creating remove material '{}'", name);
        self.materials.push(Material {
            name: name.to_string(),
            color: REMOVE_MATERIAL_COLOR,
            protected: true,
        });
        true
    }

    /// Removes every unprotected material `in_use` rejects.
    ///
    /// Returns the names of the removed materials.
    pub fn retain_used(&mut self, mut in_use: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.materials.retain(|m| {
            let keep = m.protected || in_use(&m.name);
            if !keep {
                removed.push(m.name.clone());
            }
            keep
        });
        removed
    }
}
