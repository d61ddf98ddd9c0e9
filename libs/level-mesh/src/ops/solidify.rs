//! # Solidify
//!
//! Turns an open surface (a sector floor plan) into a closed shell by
//! offsetting it along its vertex normals.
//!
//! ```text
//!   top cap    (v + n * ceiling)   ──────────────
//!                                  │            │  rim quads on
//!                                  │            │  boundary edges
//!   bottom cap (v + n * floor)     ──────────────
//! ```
//!
//! The shell faces outward: the top cap keeps the input winding, the
//! bottom cap is reversed, and rim quads are wound to face away from the
//! surface interior.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{newell_normal, Face, Mesh};
use config::constants::NORMAL_EPSILON;
use glam::DVec3;
use std::collections::HashMap;

/// Material slots assigned to the three parts of a solidified shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellMaterials {
    /// Offset copy at `ceiling`
    pub top: u32,
    /// Offset copy at `floor`
    pub bottom: u32,
    /// Side quads joining the two caps
    pub rim: u32,
}

/// Area-weighted vertex normals; `+Z` for vertices no face spans.
fn vertex_normals(mesh: &Mesh) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; mesh.vertex_count()];
    for face in mesh.faces() {
        // Newell length is proportional to area
        let normal = newell_normal(&mesh.face_positions(face));
        for &v in &face.vertices {
            normals[v as usize] += normal;
        }
    }
    normals
        .into_iter()
        .map(|n| {
            if n.length() > NORMAL_EPSILON {
                n.normalize()
            } else {
                DVec3::Z
            }
        })
        .collect()
}

/// Builds a closed shell from `mesh`.
///
/// The inner surface sits at `floor` along the vertex normals and the outer
/// surface at `ceiling`, so the shell is `ceiling - floor` thick.
///
/// # Errors
///
/// `DegenerateGeometry` when the thickness is not positive or the input
/// has no faces.
pub fn solidify(
    mesh: &Mesh,
    floor: f64,
    ceiling: f64,
    materials: ShellMaterials,
) -> MeshResult<Mesh> {
    let thickness = ceiling - floor;
    if thickness <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "shell thickness must be positive, got {} (floor {}, ceiling {})",
            thickness, floor, ceiling
        )));
    }
    if mesh.is_empty() {
        return Err(MeshError::degenerate("cannot solidify a mesh without faces"));
    }

    let count = mesh.vertex_count() as u32;
    let normals = vertex_normals(mesh);
    let mut shell = Mesh::with_capacity(mesh.vertex_count() * 2, mesh.face_count() * 3);

    // Bottom layer: 0..count, top layer: count..2*count
    for (&v, &n) in mesh.vertices().iter().zip(&normals) {
        shell.add_vertex(v + n * floor);
    }
    for (&v, &n) in mesh.vertices().iter().zip(&normals) {
        shell.add_vertex(v + n * ceiling);
    }

    for face in mesh.faces() {
        let mut top = Face::new(face.vertices.iter().map(|&v| v + count).collect(), materials.top);
        top.uvs = face.uvs.clone();
        shell.push_face(top);

        let mut bottom = Face::new(face.vertices.clone(), materials.bottom);
        bottom.uvs = face.uvs.clone();
        bottom.flip();
        shell.push_face(bottom);
    }

    // Boundary edges are used by exactly one face
    let mut edge_use: HashMap<(u32, u32), usize> = HashMap::new();
    for face in mesh.faces() {
        for (a, b) in loop_edges(face) {
            *edge_use.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    for face in mesh.faces() {
        for (a, b) in loop_edges(face) {
            if edge_use.get(&(a.min(b), a.max(b))) == Some(&1) {
                shell.add_face(vec![a, b, b + count, a + count], materials.rim);
            }
        }
    }

    Ok(shell)
}

fn loop_edges(face: &Face) -> impl Iterator<Item = (u32, u32)> + '_ {
    let n = face.vertices.len();
    (0..n).map(move |i| (face.vertices[i], face.vertices[(i + 1) % n]))
}
