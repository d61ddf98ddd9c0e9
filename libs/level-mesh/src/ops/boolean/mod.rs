//! # Boolean Operations (CSG)
//!
//! Constructive Solid Geometry operations using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); A.build(B)
//! - Difference: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); A.build(B); A.invert()
//! - Intersection: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); A.build(B); A.invert()
//!
//! Every face keeps its material slot and UVs through the operation, which
//! is what lets the build pipeline tell mask faces from room faces
//! afterwards.
//!
//! ## Example
//!
//! ```rust
//! use level_mesh::ops::boolean::{compose, BooleanOp};
//! use level_mesh::primitives::create_cube;
//! use glam::DVec3;
//!
//! let a = create_cube(DVec3::splat(2.0), true).unwrap();
//! let b = create_cube(DVec3::splat(2.0), false).unwrap();
//! let result = compose(&a, &b, BooleanOp::Union).unwrap();
//! assert!(!result.is_empty());
//! ```

mod bsp;
mod plane;
mod polygon;
mod vertex;


use crate::error::MeshResult;
use crate::mesh::{Face, Mesh};
use crate::ops::triangulate::{is_convex, triangulate_polygon};
use bsp::BspNode;
use config::constants::VERTEX_MERGE_EPSILON;
use glam::{DVec2, DVec3};
use polygon::Polygon;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertex::Vertex;

// =============================================================================
// OPERATION KIND
// =============================================================================

/// Boolean operation selector for [`compose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    /// Everything inside either operand
    Union,
    /// Only what is inside both operands
    Intersect,
    /// What is inside `a` but not `b`
    Subtract,
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Composes two meshes with the given operation.
///
/// An empty or degenerate operand is an identity, never an error:
/// - degenerate `b` returns `a` unchanged
/// - degenerate `a` returns `b` for union and intersect, `a` for subtract
pub fn compose(a: &Mesh, b: &Mesh, op: BooleanOp) -> MeshResult<Mesh> {
    if b.is_degenerate() {
        return Ok(a.clone());
    }
    if a.is_degenerate() {
        return Ok(match op {
            BooleanOp::Union | BooleanOp::Intersect => b.clone(),
            BooleanOp::Subtract => a.clone(),
        });
    }

    match op {
        BooleanOp::Union => union(a, b),
        BooleanOp::Intersect => intersection(a, b),
        BooleanOp::Subtract => difference(a, b),
    }
}

/// Compute union of two meshes.
///
/// ## Parameters
///
/// - `a`: First mesh
/// - `b`: Second mesh
///
/// ## Returns
///
/// New mesh containing all geometry from both inputs, with faces that end
/// up inside the other operand removed.
pub fn union(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    a.validate()?;
    b.validate()?;

    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(b.clone());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut bsp_a = BspNode::new(polys_a);
    let mut bsp_b = BspNode::new(polys_b);

    // a.clipTo(b) - remove parts of A inside B
    // b.clipTo(a) - remove parts of B inside A
    // b.invert(); b.clipTo(a); b.invert() - remove coplanar faces from B
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_a.build(bsp_b.all_polygons());

    Ok(polygons_to_mesh(&bsp_a.all_polygons()))
}

/// Compute difference of two meshes (A - B).
///
/// ## Parameters
///
/// - `a`: First mesh (base)
/// - `b`: Second mesh (to subtract)
pub fn difference(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    a.validate()?;
    b.validate()?;

    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(Mesh::new());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut bsp_a = BspNode::new(polys_a);
    let mut bsp_b = BspNode::new(polys_b);

    // A - B = ~(~A | B)
    bsp_a.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_a.build(bsp_b.all_polygons());
    bsp_a.invert();

    Ok(polygons_to_mesh(&bsp_a.all_polygons()))
}

/// Compute intersection of two meshes.
///
/// Returns a mesh containing only geometry that is in both inputs; empty
/// when either input is empty.
pub fn intersection(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    a.validate()?;
    b.validate()?;

    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() || polys_b.is_empty() {
        return Ok(Mesh::new());
    }

    let mut bsp_a = BspNode::new(polys_a);
    let mut bsp_b = BspNode::new(polys_b);

    // A & B = ~(~A | ~B)
    bsp_a.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_a.build(bsp_b.all_polygons());
    bsp_a.invert();

    Ok(polygons_to_mesh(&bsp_a.all_polygons()))
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Convert mesh faces to convex BSP polygons.
///
/// Convex faces map one to one; concave faces are ear-clipped first.
/// Zero-area faces are dropped.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(mesh.face_count());

    for face in mesh.faces() {
        let textured = face.has_uvs();
        let corners: Vec<Vertex> = face
            .vertices
            .iter()
            .enumerate()
            .map(|(loop_index, &v)| {
                let uv = if textured {
                    face.uvs[loop_index]
                } else {
                    DVec2::ZERO
                };
                Vertex::with_uv(mesh.vertex(v), uv)
            })
            .collect();
        let positions: Vec<DVec3> = corners.iter().map(|c| c.position).collect();

        if corners.len() == 3 || is_convex(&positions) {
            polygons.extend(Polygon::new(corners, face.material).map(|p| p.textured(textured)));
        } else {
            for [i, j, k] in triangulate_polygon(&positions) {
                let triangle = vec![corners[i], corners[j], corners[k]];
                polygons
                    .extend(Polygon::new(triangle, face.material).map(|p| p.textured(textured)));
            }
        }
    }

    polygons
}

/// Quantized position used to weld coincident polygon corners.
fn weld_key(position: DVec3) -> [i64; 3] {
    let q = (position / VERTEX_MERGE_EPSILON).round();
    [q.x as i64, q.y as i64, q.z as i64]
}

/// Convert polygons back to an indexed mesh.
///
/// Corners closer than `VERTEX_MERGE_EPSILON` share one vertex; loops that
/// collapse below three corners after welding are dropped.
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::with_capacity(polygons.len() * 2, polygons.len());
    let mut welded: HashMap<[i64; 3], u32> = HashMap::new();

    for polygon in polygons {
        let mut indices: Vec<u32> = Vec::with_capacity(polygon.vertices.len());
        let mut uvs = Vec::with_capacity(polygon.vertices.len());

        for corner in &polygon.vertices {
            let index = *welded
                .entry(weld_key(corner.position))
                .or_insert_with(|| mesh.add_vertex(corner.position));
            if indices.last() == Some(&index) {
                continue;
            }
            indices.push(index);
            uvs.push(corner.uv);
        }
        while indices.len() > 1 && indices.first() == indices.last() {
            indices.pop();
            uvs.pop();
        }
        if indices.len() < 3 {
            continue;
        }

        let mut face = Face::new(indices, polygon.material);
        if polygon.textured {
            face.uvs = uvs;
        }
        mesh.push_face(face);
    }

    mesh.compact_vertices();
    mesh
}
