//! # Cube Primitive
//!
//! Generates mesh for cube and rectangular prism shapes.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;

/// Creates a cube or rectangular prism mesh.
///
/// # Arguments
///
/// * `size` - Dimensions [x, y, z]
/// * `center` - If true, center at origin; if false, corner at origin
///
/// # Returns
///
/// A mesh with 8 vertices and 6 outward-facing quads.
///
/// # Example
///
/// ```rust
/// use level_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_cube(size: DVec3, center: bool) -> MeshResult<Mesh> {
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "Cube size must be positive: {:?}",
            size
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 6);

    let (min, max) = if center {
        let half = size / 2.0;
        (-half, half)
    } else {
        (DVec3::ZERO, size)
    };

    // Bottom face (z = min.z)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z)); // 0: left-front-bottom
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z)); // 1: right-front-bottom
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z)); // 2: right-back-bottom
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z)); // 3: left-back-bottom

    // Top face (z = max.z)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z)); // 4: left-front-top
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z)); // 5: right-front-top
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z)); // 6: right-back-top
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z)); // 7: left-back-top

    // Counter-clockwise seen from outside
    mesh.add_face(vec![v0, v3, v2, v1], 0); // bottom
    mesh.add_face(vec![v4, v5, v6, v7], 0); // top
    mesh.add_face(vec![v0, v1, v5, v4], 0); // front
    mesh.add_face(vec![v2, v3, v7, v6], 0); // back
    mesh.add_face(vec![v3, v0, v4, v7], 0); // left
    mesh.add_face(vec![v1, v2, v6, v5], 0); // right

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_counts() {
        let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_cube_not_centered() {
        let bounds = create_cube(DVec3::splat(10.0), false).unwrap().bounding_box();
        assert_eq!(bounds.min, DVec3::ZERO);
        assert_eq!(bounds.max, DVec3::splat(10.0));
    }

    #[test]
    fn test_cube_centered() {
        let bounds = create_cube(DVec3::splat(10.0), true).unwrap().bounding_box();
        assert_eq!(bounds.min, DVec3::splat(-5.0));
        assert_eq!(bounds.max, DVec3::splat(5.0));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let mesh = create_cube(DVec3::splat(2.0), true).unwrap();
        for i in 0..mesh.face_count() {
            let centroid = mesh.face_positions(mesh.face(i)).iter().sum::<DVec3>() / 4.0;
            assert_relative_eq!(mesh.face_normal(i).dot(centroid), 1.0);
        }
    }

    #[test]
    fn test_cube_validates() {
        let mesh = create_cube(DVec3::splat(10.0), false).unwrap();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cube_invalid_size() {
        assert!(create_cube(DVec3::new(0.0, 10.0, 10.0), false).is_err());
        assert!(create_cube(DVec3::new(-5.0, 10.0, 10.0), false).is_err());
    }
}
