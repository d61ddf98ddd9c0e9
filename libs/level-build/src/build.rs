//! # Level Build
//!
//! Orchestrates one build pass over a scene:
//!
//! ```text
//! reclaim → sentinel → discover → relink + prepare → bake masks → graph
//!   → for each shape in scope: compose → filter → triangulate → project → invert
//!   → link rooms → reclaim
//! ```
//!
//! Masks, the graph and the enclosure live only for the duration of the
//! pass. Authored shape geometry is never touched beyond the coordinate
//! rounding done by [`prepare_shape`].

use crate::compose::Composer;
use crate::error::BuildResult;
use crate::filter::strip_mask_faces;
use crate::graph::IntersectionGraph;
use crate::mask::MaskArena;
use crate::prepare::prepare_shape;
use crate::registry::ShapeRegistry;
use crate::scene::{ReclaimReport, Room, RoomId, Scene};
use crate::shape::ShapeId;
use crate::texture::project;
use config::constants::{LEVEL_COLLECTION, ROOM_NAME_PREFIX, ROOT_COLLECTION, SHAPES_COLLECTION};
use level_mesh::triangulate;
use std::collections::HashSet;

/// Per-build options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Only rebuild rooms of selected shapes
    ///
    /// Masks are still baked for every shape so unselected shapes keep
    /// acting as neighbors.
    pub selected_only: bool,
}

/// Summary of one build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rooms linked into the level collection
    pub rooms_built: usize,
    /// Shapes that produced no room (degenerate or failed to compose)
    pub skipped: Vec<ShapeId>,
    /// Undirected edges of the intersection graph
    pub adjacency_edges: usize,
    /// Whether some brush needed the enclosure volume
    pub enclosure_built: bool,
    /// Whether the sentinel material had to be created
    pub sentinel_created: bool,
    /// Rooms and materials removed by the reclaim passes
    pub reclaimed: ReclaimReport,
}

/// Rebuilds the rooms of a scene.
///
/// Anomalies in single shapes are logged and skipped; only invalid settings
/// fail the whole build.
pub fn build(scene: &mut Scene, options: BuildOptions) -> BuildResult<BuildReport> {
    scene.settings.validate()?;
    let precision = scene.settings.precision;
    let remove_name = scene.settings.remove_material_name().to_string();
    let flip_normals = scene.settings.flip_normals;

    log::info!(
        "building level (precision {}, selected only: {})",
        precision,
        options.selected_only
    );

    let mut report = BuildReport {
        reclaimed: scene.reclaim_unused(),
        ..BuildReport::default()
    };
    report.sentinel_created = scene.materials.ensure_remove_material(&remove_name);

    let registry =
        ShapeRegistry::discover(scene, &[ROOT_COLLECTION, LEVEL_COLLECTION, SHAPES_COLLECTION]);
    let library = scene.materials.clone();
    for id in registry.all().collect::<Vec<_>>() {
        scene.unlink_shape(id);
        scene.link_shape(id, SHAPES_COLLECTION)?;
        prepare_shape(scene.shape_mut(id)?, precision, &library);
    }
    report.skipped.extend_from_slice(registry.degenerate());

    let in_scope: HashSet<ShapeId> = if options.selected_only {
        scene.selected_shapes().collect()
    } else {
        registry.all().collect()
    };
    let unlinked = scene.unlink_rooms(LEVEL_COLLECTION, |source| {
        !options.selected_only || in_scope.contains(&source)
    });
    log::debug!("unlinked {} previous rooms", unlinked);

    let arena = MaskArena::bake(scene, &registry, precision);
    report.skipped.extend_from_slice(arena.skipped());
    let graph = IntersectionGraph::build(&arena);
    report.adjacency_edges = graph.edge_count();

    let mut composer = Composer::new(&arena, &graph, flip_normals);
    for &id in registry.shapes() {
        if !in_scope.contains(&id) {
            continue;
        }
        let Some(mask) = arena.get(id) else {
            continue;
        };
        let shape = scene.shape(id)?;
        let (name, kind, transform) = (shape.name.clone(), mask.kind, shape.transform);

        // Reject only exactly singular matrices
        let matrix = transform.matrix();
        let determinant = matrix.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            log::warn!("skipping shape '{}': transform is not invertible", name);
            report.skipped.push(id);
            continue;
        }

        // Shape slots padded to what the evaluated mesh uses, sentinel last
        let mut slots = shape.material_slots.clone();
        let used = mask.mesh.max_material().map_or(0, |m| m as usize + 1);
        if slots.len() < used {
            slots.resize(used, None);
        }
        let remove_slot = slots.len() as u32;
        slots.push(Some(remove_name.clone()));

        let world = match composer.compose_shape(id, remove_slot) {
            Ok(Some(mesh)) => mesh,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("skipping shape '{}': {}", name, e);
                report.skipped.push(id);
                continue;
            }
        };

        let local = world.transformed(&matrix.inverse());

        let stripped = strip_mask_faces(&local, &slots, &remove_name);
        let mut mesh = triangulate(&stripped.mesh);
        if shape.wants_texture() {
            mesh = project(&mesh, &transform, &shape.textures);
        }
        if composer.should_invert(kind) {
            mesh.flip_normals();
        }

        log::debug!(
            "room for '{}': {} triangles, {} mask faces stripped",
            name,
            mesh.face_count(),
            stripped.removed
        );
        scene.add_room(
            Room {
                id: RoomId(0),
                name: format!("{}{}", ROOM_NAME_PREFIX, name),
                source: id,
                transform,
                mesh,
                material_slots: stripped.slots,
            },
            LEVEL_COLLECTION,
        );
        report.rooms_built += 1;
    }
    report.enclosure_built = composer.enclosure_built();
    drop(composer);
    drop(arena);

    report.reclaimed.absorb(scene.reclaim_unused());
    log::info!(
        "built {} rooms ({} skipped, {} adjacencies)",
        report.rooms_built,
        report.skipped.len(),
        report.adjacency_edges
    );
    Ok(report)
}
