//! # Intersection Graph
//!
//! Broad-phase adjacency between masks. Two shapes are adjacent when their
//! margin-expanded bounds overlap on all three axes. False positives only
//! cost a no-op boolean; the margin keeps touching shapes from being missed.

use crate::mask::MaskArena;
use crate::shape::ShapeId;

/// Symmetric adjacency over the masks of one build pass.
///
/// Neighbor lists follow arena (registry) order, which fixes the order
/// booleans are applied in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntersectionGraph {
    nodes: Vec<ShapeId>,
    neighbors: Vec<Vec<usize>>,
}

impl IntersectionGraph {
    /// Tests every unordered pair of masks once.
    pub fn build(arena: &MaskArena) -> Self {
        let masks = arena.masks();
        let mut neighbors = vec![Vec::new(); masks.len()];

        for i in 0..masks.len() {
            for j in (i + 1)..masks.len() {
                if masks[i].bounds.intersects(&masks[j].bounds) {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }
        let graph = Self {
            nodes: masks.iter().map(|m| m.shape).collect(),
            neighbors,
        };
        log::debug!(
            "intersection graph: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edge_count()
        );
        graph
    }

    /// Shapes adjacent to `id`, in registry order.
    pub fn neighbors(&self, id: ShapeId) -> Vec<ShapeId> {
        self.node(id)
            .map(|i| self.neighbors[i].iter().map(|&j| self.nodes[j]).collect())
            .unwrap_or_default()
    }

    /// Returns true if the two shapes were recorded as adjacent.
    pub fn are_adjacent(&self, a: ShapeId, b: ShapeId) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(i), Some(j)) => self.neighbors[i].contains(&j),
            _ => false,
        }
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    fn node(&self, id: ShapeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ShapeRegistry;
    use crate::scene::Scene;
    use crate::shape::{Shape, ShapeKind, Transform};
    use config::constants::ROOT_COLLECTION;
    use glam::DVec3;
    use level_mesh::primitives::create_cube;

    fn scene_with_cubes(positions: &[DVec3]) -> (Scene, Vec<ShapeId>) {
        let mut scene = Scene::new();
        let ids = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let shape = Shape::new(
                    format!("cube{}", i),
                    Some(ShapeKind::Brush),
                    create_cube(DVec3::splat(2.0), true).unwrap(),
                )
                .with_transform(Transform::from_location(p));
                scene.add_shape(shape, ROOT_COLLECTION).unwrap()
            })
            .collect();
        (scene, ids)
    }

    fn graph_of(scene: &Scene) -> IntersectionGraph {
        let registry = ShapeRegistry::discover(scene, &[ROOT_COLLECTION]);
        IntersectionGraph::build(&MaskArena::bake(scene, &registry, 3))
    }

    #[test]
    fn test_graph_is_symmetric() {
        let (scene, ids) = scene_with_cubes(&[
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
        ]);
        let graph = graph_of(&scene);

        assert!(graph.are_adjacent(ids[0], ids[1]));
        assert!(graph.are_adjacent(ids[1], ids[0]));
        assert!(!graph.are_adjacent(ids[0], ids[2]));
        assert!(graph.neighbors(ids[2]).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_touching_shapes_are_adjacent() {
        let (scene, ids) = scene_with_cubes(&[DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)]);
        assert!(graph_of(&scene).are_adjacent(ids[0], ids[1]));
    }

    #[test]
    fn test_margin_closes_small_gap() {
        let (scene, ids) = scene_with_cubes(&[DVec3::ZERO, DVec3::new(2.005, 0.0, 0.0)]);
        assert!(graph_of(&scene).are_adjacent(ids[0], ids[1]));
    }

    #[test]
    fn test_neighbors_in_registry_order() {
        let (scene, ids) = scene_with_cubes(&[
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::ZERO,
            DVec3::new(2.0, 0.0, 0.0),
        ]);
        let graph = graph_of(&scene);
        assert_eq!(graph.neighbors(ids[2]), vec![ids[0], ids[1]]);
        assert_eq!(graph.neighbors(ids[1]), vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_unknown_shape_has_no_neighbors() {
        let (scene, _) = scene_with_cubes(&[DVec3::ZERO]);
        assert!(graph_of(&scene).neighbors(ShapeId(99)).is_empty());
    }
}
