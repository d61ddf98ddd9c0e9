//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Operations
//!
//! - `build`: Insert polygons, splitting them by existing node planes
//! - `clip_to`: Remove polygons from this tree that are inside another tree
//! - `invert`: Flip all polygons and swap front/back subtrees
//! - `all_polygons`: Collect all polygons from the tree
//!
//! ## Stack Safety
//!
//! Level geometry can produce deep, unbalanced trees (long runs of coplanar
//! wall fragments), so every traversal uses an explicit stack instead of
//! recursion.

use super::plane::Plane;
use super::polygon::{Partition, Polygon};

/// A node in the BSP tree.
///
/// # Example
///
/// ```rust,ignore
/// let mut tree = BspNode::new(polygons);
/// tree.invert();
/// let inside_out = tree.all_polygons();
/// ```
#[derive(Debug, Default)]
pub struct BspNode {
    /// Splitting plane, `None` for an empty node
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    /// Front subtree (polygons in front of plane)
    front: Option<Box<BspNode>>,
    /// Back subtree (polygons behind plane)
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a new BSP tree from polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut root = Self::default();
        root.build(polygons);
        root
    }

    /// Inserts polygons into the tree.
    ///
    /// An empty node adopts the plane of the first polygon it receives.
    /// Polygons are split by each plane on the way down; coplanar ones stay
    /// at the node whose plane they lie in.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack: Vec<(&mut BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = stack.pop() {
            let Some(first) = polygons.first() else {
                continue;
            };
            let BspNode {
                plane,
                polygons: coplanar,
                front,
                back,
            } = node;
            let plane = *plane.get_or_insert(first.plane);

            let mut out = Partition::default();
            for polygon in polygons {
                polygon.split(&plane, &mut out);
            }

            coplanar.append(&mut out.coplanar_front);
            coplanar.append(&mut out.coplanar_back);

            if !out.front.is_empty() {
                let child = front.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), out.front));
            }
            if !out.back.is_empty() {
                let child = back.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), out.back));
            }
        }
    }

    /// Inverts this BSP tree (flips all polygons and swaps subtrees).
    ///
    /// Turns the solid inside out; used for difference and intersection.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = &mut node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            let BspNode { front, back, .. } = node;
            if let Some(front) = front {
                stack.push(front.as_mut());
            }
            if let Some(back) = back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Removes the parts of `polygons` that are inside the solid represented
    /// by this tree.
    ///
    /// Polygons lying on a node plane travel with their facing: same-facing
    /// to the front side, opposite-facing to the back side.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<(&BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }
            let Some(plane) = node.plane else {
                result.extend(polygons);
                continue;
            };

            let mut out = Partition::default();
            for polygon in polygons {
                polygon.split(&plane, &mut out);
            }
            let mut front_polys = out.front;
            front_polys.append(&mut out.coplanar_front);
            let mut back_polys = out.back;
            back_polys.append(&mut out.coplanar_back);

            match &node.front {
                Some(front) => stack.push((front.as_ref(), front_polys)),
                None => result.extend(front_polys),
            }
            // With no back subtree, back polygons are inside the solid
            if let Some(back) = &node.back {
                stack.push((back.as_ref(), back_polys));
            }
        }

        result
    }

    /// Clips this tree's polygons to another tree.
    pub fn clip_to(&mut self, other: &BspNode) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));

            let BspNode { front, back, .. } = node;
            if let Some(front) = front {
                stack.push(front.as_mut());
            }
            if let Some(back) = back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Collects all polygons from this tree.
    ///
    /// Order is fixed for a given tree: node, then front, then back.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());

            if let Some(back) = &node.back {
                stack.push(back.as_ref());
            }
            if let Some(front) = &node.front {
                stack.push(front.as_ref());
            }
        }

        result
    }

    /// Returns the number of polygons in this tree.
    #[cfg(test)]
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            count += node.polygons.len();

            if let Some(front) = &node.front {
                stack.push(front.as_ref());
            }
            if let Some(back) = &node.back {
                stack.push(back.as_ref());
            }
        }

        count
    }

    /// Returns the depth of this tree.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&BspNode, usize)> = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);

            if let Some(front) = &node.front {
                stack.push((front.as_ref(), depth + 1));
            }
            if let Some(back) = &node.back {
                stack.push((back.as_ref(), depth + 1));
            }
        }

        max_depth
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        // Iterative drop; the default recursive one overflows on deep trees
        let mut stack = Vec::new();

        if let Some(front) = self.front.take() {
            stack.push(front);
        }
        if let Some(back) = self.back.take() {
            stack.push(back);
        }

        while let Some(mut node) = stack.pop() {
            if let Some(front) = node.front.take() {
                stack.push(front);
            }
            if let Some(back) = node.back.take() {
                stack.push(back);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::vertex::Vertex;
    use super::*;
    use glam::DVec3;

    fn triangle_at(z: f64) -> Polygon {
        Polygon::new(
            vec![
                Vertex::new(DVec3::new(0.0, 0.0, z)),
                Vertex::new(DVec3::new(1.0, 0.0, z)),
                Vertex::new(DVec3::new(0.0, 1.0, z)),
            ],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_bsp_new_empty() {
        let tree = BspNode::new(vec![]);
        assert_eq!(tree.polygon_count(), 0);
        assert!(tree.plane.is_none());
    }

    #[test]
    fn test_bsp_coplanar_polygons_share_node() {
        let tree = BspNode::new(vec![triangle_at(0.0), triangle_at(0.0)]);
        assert_eq!(tree.polygons.len(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_bsp_new_multiple() {
        let tree = BspNode::new(vec![triangle_at(0.0), triangle_at(1.0), triangle_at(-1.0)]);
        assert_eq!(tree.polygon_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_bsp_build_is_incremental() {
        let mut tree = BspNode::new(vec![triangle_at(0.0)]);
        tree.build(vec![triangle_at(2.0)]);
        assert_eq!(tree.all_polygons().len(), 2);
    }

    #[test]
    fn test_bsp_invert() {
        let poly = triangle_at(0.0);
        let original_normal = poly.plane.normal;

        let mut tree = BspNode::new(vec![poly]);
        tree.invert();

        assert!((original_normal + tree.polygons[0].plane.normal).length() < 1e-9);
        assert!((original_normal + tree.plane.unwrap().normal).length() < 1e-9);
    }

    #[test]
    fn test_bsp_clip_polygons_front_survives() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        let result = tree.clip_polygons(vec![triangle_at(1.0)]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_bsp_clip_polygons_back_removed() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);
        let result = tree.clip_polygons(vec![triangle_at(-1.0)]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_bsp_clip_coplanar_by_facing() {
        let tree = BspNode::new(vec![triangle_at(0.0)]);

        // Same facing: coplanar front, kept
        assert_eq!(tree.clip_polygons(vec![triangle_at(0.0)]).len(), 1);

        // Opposite facing: coplanar back, inside
        let mut flipped = triangle_at(0.0);
        flipped.flip();
        assert!(tree.clip_polygons(vec![flipped]).is_empty());
    }

    #[test]
    fn test_bsp_deep_tree_drops_without_overflow() {
        let polygons: Vec<Polygon> = (0..4_000).map(|i| triangle_at(i as f64)).collect();
        let tree = BspNode::new(polygons);
        assert_eq!(tree.polygon_count(), 4_000);
        drop(tree);
    }
}
