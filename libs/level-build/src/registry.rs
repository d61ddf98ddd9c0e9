//! # Shape Registry
//!
//! Discovers the shapes taking part in a build. Discovery order is the
//! canonical order of the whole pass: masks, graph neighbors and
//! composition all follow it.

use crate::scene::Scene;
use crate::shape::ShapeId;
use std::collections::HashSet;

/// Shapes found in a set of collections, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeRegistry {
    shapes: Vec<ShapeId>,
    degenerate: Vec<ShapeId>,
}

impl ShapeRegistry {
    /// Walks `collections` in order and collects every object with a kind.
    ///
    /// An object linked to several collections is listed once, at its first
    /// occurrence. Shapes with fewer than 3 vertices are set aside as
    /// degenerate. Missing collections are skipped.
    pub fn discover(scene: &Scene, collections: &[&str]) -> Self {
        let mut seen = HashSet::new();
        let mut registry = Self::default();

        for name in collections {
            let Ok(collection) = scene.collection(name) else {
                log::debug!("collection '{}' not found, skipping", name);
                continue;
            };
            for &id in &collection.shapes {
                if !seen.insert(id) {
                    continue;
                }
                let Ok(shape) = scene.shape(id) else {
                    continue;
                };
                if !shape.is_shape() {
                    continue;
                }
                if shape.mesh.vertex_count() < 3 {
                    log::warn!(
                        "skipping shape '{}': {} vertices",
                        shape.name,
                        shape.mesh.vertex_count()
                    );
                    registry.degenerate.push(id);
                } else {
                    registry.shapes.push(id);
                }
            }
        }

        log::debug!(
            "registry: {} shapes, {} degenerate",
            registry.shapes.len(),
            registry.degenerate.len()
        );
        registry
    }

    /// Usable shapes in discovery order.
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    /// Shapes excluded for having fewer than 3 vertices.
    pub fn degenerate(&self) -> &[ShapeId] {
        &self.degenerate
    }

    /// Every discovered shape, usable ones first.
    pub fn all(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().chain(&self.degenerate).copied()
    }

    /// Number of usable shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no usable shape was found.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns true if `id` is a usable shape of this registry.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains(&id)
    }
}
