//! # Triangulation
//!
//! Ear-clipping triangulation of planar polygon faces.
//!
//! Each face is projected onto the coordinate plane its normal is most
//! aligned with (keeping the winding counter-clockwise), then ears are cut
//! using exact `orient2d` predicates from the `robust` crate.

use crate::mesh::{newell_normal, Face, Mesh};
use config::constants::NORMAL_EPSILON;
use glam::DVec3;
use robust::{orient2d, Coord};

/// Projects a 3D loop to 2D so that its front side faces the viewer.
fn project_loop(points: &[DVec3], normal: DVec3) -> Vec<Coord<f64>> {
    let abs = normal.abs();
    points
        .iter()
        .map(|p| {
            let (x, y) = if abs.z >= abs.x && abs.z >= abs.y {
                if normal.z >= 0.0 { (p.x, p.y) } else { (p.y, p.x) }
            } else if abs.x >= abs.y {
                if normal.x >= 0.0 { (p.y, p.z) } else { (p.z, p.y) }
            } else if normal.y >= 0.0 {
                (p.z, p.x)
            } else {
                (p.x, p.z)
            };
            Coord { x, y }
        })
        .collect()
}

/// Returns true if the planar loop is convex (collinear corners allowed).
pub fn is_convex(points: &[DVec3]) -> bool {
    if points.len() <= 3 {
        return true;
    }
    let normal = newell_normal(points);
    if normal.length() < NORMAL_EPSILON {
        return false;
    }
    let projected = project_loop(points, normal);
    let n = projected.len();
    (0..n).all(|i| {
        let a = projected[(i + n - 1) % n];
        let b = projected[i];
        let c = projected[(i + 1) % n];
        orient2d(a, b, c) >= 0.0
    })
}

/// Triangulates a planar loop, returning corner index triples.
///
/// Triangles keep the loop's winding. Zero-area loops produce nothing.
/// If no ear can be found (self-intersecting input) the remainder is
/// fanned.
pub fn triangulate_polygon(points: &[DVec3]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let normal = newell_normal(points);
    if normal.length() < NORMAL_EPSILON {
        return Vec::new();
    }
    if n == 3 {
        return vec![[0, 1, 2]];
    }

    let projected = project_loop(points, normal);
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);
    let mut cursor = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let m = remaining.len();
        if misses >= m {
            log::debug!("ear clipping stalled with {} corners left, fanning", m);
            for i in 1..m - 1 {
                triangles.push([remaining[0], remaining[i], remaining[i + 1]]);
            }
            return triangles;
        }

        let position = cursor % m;
        let prev = remaining[(position + m - 1) % m];
        let curr = remaining[position];
        let next = remaining[(position + 1) % m];

        if is_ear(&projected, &remaining, prev, curr, next) {
            triangles.push([prev, curr, next]);
            remaining.remove(position);
            cursor = position;
            misses = 0;
        } else {
            cursor = position + 1;
            misses += 1;
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

fn is_ear(projected: &[Coord<f64>], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (projected[a], projected[b], projected[c]);
    if orient2d(pa, pb, pc) <= 0.0 {
        return false;
    }
    remaining.iter().all(|&i| {
        if i == a || i == b || i == c {
            return true;
        }
        let p = projected[i];
        if (p.x == pa.x && p.y == pa.y) || (p.x == pb.x && p.y == pb.y) || (p.x == pc.x && p.y == pc.y)
        {
            return true;
        }
        // Corners on the ear's boundary block it too, or the diagonal
        // would run through a reflex vertex.
        !(orient2d(pa, pb, p) >= 0.0 && orient2d(pb, pc, p) >= 0.0 && orient2d(pc, pa, p) >= 0.0)
    })
}

/// Returns a copy of `mesh` where every face is a triangle.
///
/// Materials and per-loop UVs are carried over to the new faces.
pub fn triangulate(mesh: &Mesh) -> Mesh {
    let mut result = Mesh::with_capacity(mesh.vertex_count(), mesh.triangle_count());
    for &v in mesh.vertices() {
        result.add_vertex(v);
    }

    for face in mesh.faces() {
        if face.len() == 3 {
            result.push_face(face.clone());
            continue;
        }
        let positions = mesh.face_positions(face);
        for corners in triangulate_polygon(&positions) {
            let mut triangle = Face::new(corners.iter().map(|&i| face.vertices[i]).collect(), face.material);
            if face.has_uvs() {
                triangle.uvs = corners.iter().map(|&i| face.uvs[i]).collect();
            }
            result.push_face(triangle);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn l_shape() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ]
    }

    fn area(points: &[DVec3], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| newell_normal(&[points[t[0]], points[t[1]], points[t[2]]]).z * 0.5)
            .sum()
    }

    #[test]
    fn test_is_convex() {
        let square = vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y];
        assert!(is_convex(&square));
        assert!(!is_convex(&l_shape()));
    }

    #[test]
    fn test_triangulate_concave_preserves_area() {
        let points = l_shape();
        let triangles = triangulate_polygon(&points);
        assert_eq!(triangles.len(), 4);
        // All triangles wind the same way as the loop
        assert_relative_eq!(area(&points, &triangles), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangulate_notched_floor_plan() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            DVec3::new(4.0, 2.0, 0.0),
            DVec3::new(2.0, 2.0, 0.0),
            DVec3::new(2.0, 4.0, 0.0),
            DVec3::new(0.0, 4.0, 0.0),
        ];
        let triangles = triangulate_polygon(&points);

        assert_eq!(triangles.len(), 4);
        assert_relative_eq!(area(&points, &triangles), 12.0, epsilon = 1e-12);
        for t in &triangles {
            let centroid = (points[t[0]] + points[t[1]] + points[t[2]]) / 3.0;
            assert!(!(centroid.x > 2.0 && centroid.y > 2.0), "triangle {:?} covers the notch", t);
            // No triangle is inverted or flat
            assert!(newell_normal(&[points[t[0]], points[t[1]], points[t[2]]]).z > 0.0);
        }
    }

    #[test]
    fn test_triangulate_vertical_face() {
        // Quad facing -y
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.0),
        ];
        let triangles = triangulate_polygon(&points);
        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            let n = newell_normal(&[points[t[0]], points[t[1]], points[t[2]]]);
            assert!(n.y < 0.0);
        }
    }

    #[test]
    fn test_triangulate_degenerate_is_empty() {
        let points = vec![DVec3::ZERO, DVec3::X, DVec3::X * 2.0, DVec3::X * 3.0];
        assert!(triangulate_polygon(&points).is_empty());
    }

    #[test]
    fn test_triangulate_mesh_keeps_material_and_uvs() {
        let mut mesh = Mesh::new();
        for p in [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y] {
            mesh.add_vertex(p);
        }
        let mut face = Face::new(vec![0, 1, 2, 3], 4);
        face.uvs = vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y];
        mesh.push_face(face);

        let result = triangulate(&mesh);
        assert_eq!(result.face_count(), 2);
        assert!(result.faces().iter().all(|f| f.len() == 3 && f.material == 4));
        assert!(result.faces().iter().all(Face::has_uvs));
        assert_eq!(result.vertex_count(), 4);
    }
}
