//! # Composition Engine
//!
//! Applies the per-kind boolean rules to one shape at a time:
//!
//! ```text
//! Sector2D / Sector3D:  own ∪ mask(n) for every neighbor n
//! Brush:                (own ∪ mask(b) for every neighboring brush b) ∩ enclosure
//! ```
//!
//! Neighbor masks enter tagged with the remove slot of the room being
//! built, so whatever they contribute is stripped by the filter afterwards.
//! The enclosure is the union of every enclosing mask, built on first use
//! and shared by all brushes of the pass. Without any enclosing mask the
//! enclosure is empty and every brush composes to an empty mesh.

use crate::graph::IntersectionGraph;
use crate::mask::MaskArena;
use crate::shape::{ShapeId, ShapeKind};
use level_mesh::{compose, BooleanOp, Mesh, MeshResult};

/// Composes room geometry from the masks of one build pass.
#[derive(Debug)]
pub struct Composer<'a> {
    arena: &'a MaskArena,
    graph: &'a IntersectionGraph,
    flip_normals: bool,
    enclosure: Option<Mesh>,
}

impl<'a> Composer<'a> {
    /// Creates a composer over a baked arena and its graph.
    pub fn new(arena: &'a MaskArena, graph: &'a IntersectionGraph, flip_normals: bool) -> Self {
        Self {
            arena,
            graph,
            flip_normals,
            enclosure: None,
        }
    }

    /// Composes the world-space geometry of `id`.
    ///
    /// Faces keep the shape's own slots; faces contributed by other masks
    /// carry `remove_slot`. Returns `None` if the shape has no mask.
    pub fn compose_shape(&mut self, id: ShapeId, remove_slot: u32) -> MeshResult<Option<Mesh>> {
        let (arena, graph) = (self.arena, self.graph);
        let Some(mask) = arena.get(id) else {
            return Ok(None);
        };
        let mut result = mask.mesh.clone();

        match mask.kind {
            ShapeKind::Sector2D | ShapeKind::Sector3D => {
                for neighbor in graph.neighbors(id) {
                    if let Some(other) = arena.get(neighbor) {
                        result = compose(&result, &other.tagged(remove_slot), BooleanOp::Union)?;
                    }
                }
            }
            ShapeKind::Brush => {
                for neighbor in graph.neighbors(id) {
                    match arena.get(neighbor) {
                        Some(other) if other.kind == ShapeKind::Brush => {
                            result =
                                compose(&result, &other.tagged(remove_slot), BooleanOp::Union)?;
                        }
                        _ => {}
                    }
                }
                let enclosure = self.enclosure()?;
                if enclosure.is_empty() {
                    // No sector encloses anything, so nothing of the brush survives
                    result = Mesh::new();
                } else {
                    let mut enclosure = enclosure.clone();
                    enclosure.set_material(remove_slot);
                    result = compose(&result, &enclosure, BooleanOp::Intersect)?;
                }
            }
        }

        log::debug!(
            "composed {} ({}): {} faces",
            id,
            mask.kind,
            result.face_count()
        );
        Ok(Some(result))
    }

    /// Whether rooms of this kind are inverted after composition.
    pub fn should_invert(&self, kind: ShapeKind) -> bool {
        kind.is_enclosing() && self.flip_normals
    }

    /// Returns true once some brush has needed the enclosure.
    pub fn enclosure_built(&self) -> bool {
        self.enclosure.is_some()
    }

    fn enclosure(&mut self) -> MeshResult<&Mesh> {
        if self.enclosure.is_none() {
            let mut volume = Mesh::new();
            let mut sectors = 0;
            for mask in self.arena.masks().iter().filter(|m| m.kind.is_enclosing()) {
                volume = compose(&volume, &mask.tagged(0), BooleanOp::Union)?;
                sectors += 1;
            }
            log::debug!(
                "built enclosure from {} sectors: {} faces",
                sectors,
                volume.face_count()
            );
            self.enclosure = Some(volume);
        }
        Ok(self.enclosure.get_or_insert_with(Mesh::new))
    }
}
