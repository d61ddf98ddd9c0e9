//! # Mask Builder
//!
//! Bakes every registered shape into a world-space boolean operand. Masks
//! live in a [`MaskArena`] owned by one build pass and are dropped together
//! when the pass ends.
//!
//! A mask keeps the evaluated slot indices of its shape. The composer tags
//! it with the remove slot of whichever room consumes it, since each room
//! has its own slot table.

use crate::registry::ShapeRegistry;
use crate::scene::Scene;
use crate::shape::{Shape, ShapeId, ShapeKind, TextureGroup};
use crate::prepare::sector_slot;
use config::constants::{quantize, BOUNDS_MARGIN};
use level_mesh::{solidify, BoundingBox, Mesh, MeshResult, ShellMaterials};

// =============================================================================
// EVALUATION
// =============================================================================

/// Evaluates a shape in its local space.
///
/// 2D sectors are solidified into a shell from `floor_height` to
/// `ceiling_height` with the `[ceiling, floor, wall]` slot layout. Other
/// kinds are used as authored.
pub fn evaluate(shape: &Shape) -> MeshResult<Mesh> {
    match shape.kind {
        Some(ShapeKind::Sector2D) => solidify(
            &shape.mesh,
            shape.floor_height,
            shape.ceiling_height,
            ShellMaterials {
                top: sector_slot(TextureGroup::Ceiling) as u32,
                bottom: sector_slot(TextureGroup::Floor) as u32,
                rim: sector_slot(TextureGroup::Wall) as u32,
            },
        ),
        _ => Ok(shape.mesh.clone()),
    }
}

/// Evaluates a shape and places it in world space, rounded to `precision`.
pub fn evaluate_world(shape: &Shape, precision: u32) -> MeshResult<Mesh> {
    let mut mesh = evaluate(shape)?;
    mesh.transform(&shape.transform.matrix());
    mesh.map_positions(|p| p.map(|c| quantize(c, precision)));
    Ok(mesh)
}

// =============================================================================
// MASKS
// =============================================================================

/// World-space operand baked from one shape.
///
/// Baked faces are not yet on the remove slot. Each room has its own slot
/// table, so the sentinel slot is applied when the mask is consumed, via
/// [`Mask::tagged`].
#[derive(Debug, Clone)]
pub struct Mask {
    /// Source shape
    pub shape: ShapeId,
    /// Kind of the source shape
    pub kind: ShapeKind,
    /// Evaluated world geometry with the shape's own slots, untagged
    pub mesh: Mesh,
    /// World bounds grown by [`BOUNDS_MARGIN`]
    pub bounds: BoundingBox,
}

impl Mask {
    /// Copy of the mask geometry with every face on `slot`.
    pub fn tagged(&self, slot: u32) -> Mesh {
        let mut mesh = self.mesh.clone();
        mesh.set_material(slot);
        mesh
    }
}

/// Masks of one build pass, in registry order.
#[derive(Debug, Default)]
pub struct MaskArena {
    masks: Vec<Mask>,
    skipped: Vec<ShapeId>,
}

impl MaskArena {
    /// Bakes a mask for every usable shape of the registry.
    ///
    /// Shapes that fail to evaluate (for example a shell with no thickness)
    /// are skipped with a warning and recorded in [`MaskArena::skipped`].
    pub fn bake(scene: &Scene, registry: &ShapeRegistry, precision: u32) -> Self {
        let mut arena = Self::default();
        for &id in registry.shapes() {
            let Ok(shape) = scene.shape(id) else {
                continue;
            };
            let Some(kind) = shape.kind else {
                continue;
            };
            match evaluate_world(shape, precision) {
                Ok(mesh) => {
                    let bounds = mesh.bounding_box().expanded(BOUNDS_MARGIN);
                    arena.masks.push(Mask {
                        shape: id,
                        kind,
                        mesh,
                        bounds,
                    });
                }
                Err(e) => {
                    log::warn!("skipping shape '{}': {}", shape.name, e);
                    arena.skipped.push(id);
                }
            }
        }
        log::debug!("baked {} masks", arena.masks.len());
        arena
    }

    /// Mask of a shape.
    pub fn get(&self, id: ShapeId) -> Option<&Mask> {
        self.masks.iter().find(|m| m.shape == id)
    }

    /// Position of a shape's mask in arena order.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.masks.iter().position(|m| m.shape == id)
    }

    /// All masks in registry order.
    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    /// Shapes whose evaluation failed.
    pub fn skipped(&self) -> &[ShapeId] {
        &self.skipped
    }

    /// Number of masks.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Returns true if no mask was baked.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Transform;
    use approx::assert_relative_eq;
    use config::constants::ROOT_COLLECTION;
    use glam::DVec3;
    use level_mesh::primitives::{create_cube, create_plane};

    fn sector(floor: f64, ceiling: f64) -> Shape {
        Shape::new("room", Some(ShapeKind::Sector2D), create_plane(2.0)).with_heights(floor, ceiling)
    }

    #[test]
    fn test_evaluate_sector_shell() {
        let shell = evaluate(&sector(0.0, 3.0)).unwrap();
        let bounds = shell.bounding_box();

        assert_relative_eq!(bounds.min.z, 0.0);
        assert_relative_eq!(bounds.max.z, 3.0);
        assert_eq!(shell.face_count(), 6);
        assert!(shell.uses_material(0));
        assert!(shell.uses_material(1));
        assert!(shell.uses_material(2));
    }

    #[test]
    fn test_evaluate_brush_is_authored_mesh() {
        let cube = create_cube(DVec3::ONE, true).unwrap();
        let brush = Shape::new("b", Some(ShapeKind::Brush), cube.clone());
        assert_eq!(evaluate(&brush).unwrap(), cube);
    }

    #[test]
    fn test_evaluate_world_applies_transform() {
        let brush = Shape::new("b", Some(ShapeKind::Brush), create_cube(DVec3::ONE, true).unwrap())
            .with_transform(Transform {
                location: DVec3::new(10.0, 0.0, 0.0),
                rotation: DVec3::ZERO,
                scale: DVec3::new(2.0, 1.0, 1.0),
            });

        let mesh = evaluate_world(&brush, 3).unwrap();
        let bounds = mesh.bounding_box();

        assert_relative_eq!(bounds.min.x, 9.0);
        assert_relative_eq!(bounds.max.x, 11.0);
    }

    #[test]
    fn test_tagged_sets_every_face() {
        let mask = Mask {
            shape: ShapeId(0),
            kind: ShapeKind::Brush,
            mesh: create_cube(DVec3::ONE, true).unwrap(),
            bounds: BoundingBox::empty(),
        };
        let tagged = mask.tagged(7);
        assert!(tagged.faces().iter().all(|f| f.material == 7));
    }

    #[test]
    fn test_bake_skips_inverted_shell() {
        let mut scene = Scene::new();
        let bad = scene.add_shape(sector(3.0, 1.0), ROOT_COLLECTION).unwrap();
        let good = scene.add_shape(sector(0.0, 3.0), ROOT_COLLECTION).unwrap();
        let registry = ShapeRegistry::discover(&scene, &[ROOT_COLLECTION]);

        let arena = MaskArena::bake(&scene, &registry, 3);

        assert_eq!(arena.len(), 1);
        assert_eq!(arena.skipped(), &[bad]);
        let mask = arena.get(good).unwrap();
        assert_relative_eq!(mask.bounds.max.z, 3.0 + BOUNDS_MARGIN);
        assert_eq!(arena.index_of(good), Some(0));
    }
}
