//! # Auto-Texture Projector
//!
//! Box projection of UVs. Each face is mapped onto the plane orthogonal to
//! the dominant axis of its normal and uses the texture parameters of the
//! group that axis selects:
//!
//! ```text
//! ±x, ±y  → wall
//! +z      → ceiling
//! -z      → floor
//! ```
//!
//! The result is a pure function of the face, the shape transform and the
//! texture settings, so projecting twice gives the same UVs.

use crate::shape::{TextureGroup, TextureParams, TextureSettings, Transform};
use glam::{DVec2, DVec3};
use level_mesh::Mesh;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes spanning the projection plane, in `(u, v)` order.
    pub fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Dominant axis with the sign of the normal along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    /// Dominant axis
    pub axis: Axis,
    /// True when the normal points toward the negative side
    pub negative: bool,
}

impl Direction {
    /// Texture group faces pointing this way are mapped with.
    pub fn group(self) -> TextureGroup {
        match (self.axis, self.negative) {
            (Axis::Z, false) => TextureGroup::Ceiling,
            (Axis::Z, true) => TextureGroup::Floor,
            _ => TextureGroup::Wall,
        }
    }
}

/// Axis with the largest absolute normal component.
///
/// Candidates are tried in x, y, z order and replace the current pick only
/// when strictly larger, so ties go to the earlier axis.
pub fn dominant_axis(normal: DVec3) -> Axis {
    let abs = normal.abs();
    let mut axis = Axis::X;
    let mut largest = abs.x;
    if abs.y > largest {
        axis = Axis::Y;
        largest = abs.y;
    }
    if abs.z > largest {
        axis = Axis::Z;
    }
    axis
}

/// Dominant axis of `normal` together with its sign.
pub fn direction(normal: DVec3) -> Direction {
    let axis = dominant_axis(normal);
    Direction {
        axis,
        negative: normal[axis.index()] < 0.0,
    }
}

/// Maps one local-space position to a UV.
///
/// Plane coordinates are taken as `local * scale + location` per axis,
/// rotated by the group rotation (degrees) and then scaled and offset.
pub fn project_uv(
    position: DVec3,
    axis: Axis,
    transform: &Transform,
    params: &TextureParams,
) -> DVec2 {
    let (u_axis, v_axis) = axis.plane_axes();
    let world = |a: Axis| {
        let i = a.index();
        position[i] * transform.scale[i] + transform.location[i]
    };
    let uv = DVec2::new(world(u_axis), world(v_axis));
    let rotated = DVec2::from_angle(params.rotation.to_radians()).rotate(uv);
    rotated * params.scale + params.offset
}

/// Recomputes the UVs of every face of a local-space mesh.
pub fn project(mesh: &Mesh, transform: &Transform, textures: &TextureSettings) -> Mesh {
    let mut result = mesh.clone();
    for index in 0..mesh.face_count() {
        let face = mesh.face(index);
        let dir = direction(mesh.face_normal(index));
        let params = textures.get(dir.group());
        result.faces_mut()[index].uvs = face
            .vertices
            .iter()
            .map(|&v| project_uv(mesh.vertex(v), dir.axis, transform, params))
            .collect();
    }
    result
}
