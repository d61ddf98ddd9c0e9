//! # Polygon for BSP Operations
//!
//! Convex polygon with plane, material slot and splitting support.

use super::plane::{Classification, Plane};
use super::vertex::Vertex;

// =============================================================================
// POLYGON
// =============================================================================

/// A convex polygon with associated plane.
///
/// The material slot and the textured flag travel with every fragment the
/// polygon is split into, so composed faces keep their source material.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order.
    pub vertices: Vec<Vertex>,
    /// Plane containing this polygon.
    pub plane: Plane,
    /// Material slot of the source face.
    pub material: u32,
    /// Whether the vertex UVs are meaningful.
    pub textured: bool,
}

impl Polygon {
    /// Create polygon from vertices.
    ///
    /// Returns `None` if the vertices don't span a plane.
    pub fn new(vertices: Vec<Vertex>, material: u32) -> Option<Self> {
        let positions: Vec<_> = vertices.iter().map(|v| v.position).collect();
        let plane = Plane::from_points(&positions)?;
        Some(Self {
            vertices,
            plane,
            material,
            textured: false,
        })
    }

    /// Marks the polygon as carrying texture coordinates.
    pub fn textured(mut self, textured: bool) -> Self {
        self.textured = textured;
        self
    }

    /// Builds a fragment on the same plane as `self`.
    fn fragment(&self, vertices: Vec<Vertex>) -> Polygon {
        Polygon {
            vertices,
            plane: self.plane,
            material: self.material,
            textured: self.textured,
        }
    }

    /// Flip the polygon (reverse winding order and plane).
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Classify this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front_count = 0;
        let mut back_count = 0;

        for v in &self.vertices {
            match plane.classify_point(v.position) {
                Classification::Front => front_count += 1,
                Classification::Back => back_count += 1,
                _ => {}
            }
        }

        match (front_count > 0, back_count > 0) {
            (true, true) => Classification::Spanning,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (false, false) => Classification::Coplanar,
        }
    }

    /// Split polygon by a plane into the buckets of `out`.
    ///
    /// Coplanar polygons go to `coplanar_front` when they face the same way
    /// as the plane and to `coplanar_back` otherwise.
    pub fn split(self, plane: &Plane, out: &mut Partition) {
        match self.classify(plane) {
            Classification::Coplanar => {
                if self.plane.normal.dot(plane.normal) > 0.0 {
                    out.coplanar_front.push(self);
                } else {
                    out.coplanar_back.push(self);
                }
            }
            Classification::Front => out.front.push(self),
            Classification::Back => out.back.push(self),
            Classification::Spanning => {
                let count = self.vertices.len();
                let mut front_verts = Vec::with_capacity(count + 1);
                let mut back_verts = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let vi = &self.vertices[i];
                    let vj = &self.vertices[(i + 1) % count];

                    let ti = plane.classify_point(vi.position);
                    let tj = plane.classify_point(vj.position);

                    if ti != Classification::Back {
                        front_verts.push(*vi);
                    }
                    if ti != Classification::Front {
                        back_verts.push(*vi);
                    }

                    // Edge crosses the plane
                    if matches!(
                        (ti, tj),
                        (Classification::Front, Classification::Back)
                            | (Classification::Back, Classification::Front)
                    ) {
                        let di = plane.signed_distance(vi.position);
                        let dj = plane.signed_distance(vj.position);
                        let intersection = vi.lerp(vj, di / (di - dj));
                        front_verts.push(intersection);
                        back_verts.push(intersection);
                    }
                }

                if front_verts.len() >= 3 {
                    out.front.push(self.fragment(front_verts));
                }
                if back_verts.len() >= 3 {
                    out.back.push(self.fragment(back_verts));
                }
            }
        }
    }
}

// =============================================================================
// PARTITION
// =============================================================================

/// Output buckets of [`Polygon::split`].
#[derive(Debug, Default)]
pub struct Partition {
    /// Coplanar, facing the same way as the plane.
    pub coplanar_front: Vec<Polygon>,
    /// Coplanar, facing away from the plane.
    pub coplanar_back: Vec<Polygon>,
    /// Strictly in front.
    pub front: Vec<Polygon>,
    /// Strictly behind.
    pub back: Vec<Polygon>,
}

// =============================================================================
// TESTS
// =============================================================================
