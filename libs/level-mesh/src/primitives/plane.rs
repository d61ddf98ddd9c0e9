//! # Plane Primitive
//!
//! Square quad on the XY plane, the default floor plan of a new sector.

use crate::mesh::Mesh;
use glam::DVec3;

/// Creates a square quad of side `size` centered at the origin, facing `+Z`.
///
/// # Example
///
/// ```rust
/// use level_mesh::primitives::create_plane;
///
/// let mesh = create_plane(2.0);
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.face_count(), 1);
/// ```
pub fn create_plane(size: f64) -> Mesh {
    let half = size / 2.0;
    let mut mesh = Mesh::with_capacity(4, 1);

    let v0 = mesh.add_vertex(DVec3::new(-half, -half, 0.0));
    let v1 = mesh.add_vertex(DVec3::new(half, -half, 0.0));
    let v2 = mesh.add_vertex(DVec3::new(half, half, 0.0));
    let v3 = mesh.add_vertex(DVec3::new(-half, half, 0.0));

    // Counter-clockwise seen from above
    mesh.add_face(vec![v0, v1, v2, v3], 0);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_faces_up() {
        let mesh = create_plane(2.0);
        assert_relative_eq!(mesh.face_normal(0).z, 1.0);
        assert_relative_eq!(mesh.face_area(0), 4.0);
    }

    #[test]
    fn test_plane_centered() {
        let bounds = create_plane(2.0).bounding_box();
        assert_eq!(bounds.min, DVec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 1.0, 0.0));
    }
}
