//! # Mesh Data Structure
//!
//! Polygon mesh with per-face material slots and optional per-loop UVs.
//!
//! Faces are n-gons that reference shared vertex positions. Each face keeps
//! the index of the material slot it is drawn with; the slot table itself is
//! owned by whoever owns the mesh (a shape, a mask, a room).

use crate::bounds::BoundingBox;
use crate::error::{MeshError, MeshResult};
use config::constants::NORMAL_EPSILON;
use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// FACE
// =============================================================================

/// A polygon face of a [`Mesh`].
///
/// `uvs` is either empty (no texture coordinates) or holds one coordinate
/// per loop, in the same order as `vertices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices in loop order (counter-clockwise seen from the front)
    pub vertices: Vec<u32>,
    /// Material slot index
    #[serde(default)]
    pub material: u32,
    /// Per-loop texture coordinates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uvs: Vec<DVec2>,
}

impl Face {
    /// Creates an untextured face.
    pub fn new(vertices: Vec<u32>, material: u32) -> Self {
        Self {
            vertices,
            material,
            uvs: Vec::new(),
        }
    }

    /// Returns the number of loops (corners) of this face.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the face has no loops.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if every loop carries a texture coordinate.
    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() == self.vertices.len()
    }

    /// Reverses the winding (and the UV loop with it).
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.uvs.reverse();
    }
}

// =============================================================================
// MESH
// =============================================================================

/// A polygon mesh with vertices and material-tagged faces.
///
/// All geometry calculations use f64.
///
/// # Example
///
/// ```rust
/// use level_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// let a = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(vec![a, b, c], 0);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Polygon faces
    faces: Vec<Face>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Creates a mesh from raw parts, validating every face.
    pub fn from_parts(vertices: Vec<DVec3>, faces: Vec<Face>) -> MeshResult<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    // =========================================================================
    // COUNTS
    // =========================================================================

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of triangles a fan of every face would produce.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }

    /// Returns true if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a face by vertex indices and returns its index.
    pub fn add_face(&mut self, vertices: Vec<u32>, material: u32) -> usize {
        self.faces.push(Face::new(vertices, material));
        self.faces.len() - 1
    }

    /// Adds an already built face and returns its index.
    pub fn push_face(&mut self, face: Face) -> usize {
        self.faces.push(face);
        self.faces.len() - 1
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a mutable reference to the vertices.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns a mutable reference to the faces.
    #[inline]
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the face at the given index.
    #[inline]
    pub fn face(&self, index: usize) -> &Face {
        &self.faces[index]
    }

    /// Returns the positions of a face's loops.
    pub fn face_positions(&self, face: &Face) -> Vec<DVec3> {
        face.vertices.iter().map(|&i| self.vertex(i)).collect()
    }

    /// Returns the unit normal of a face, or zero for a degenerate face.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let normal = newell_normal(&self.face_positions(&self.faces[index]));
        let length = normal.length();
        if length > NORMAL_EPSILON {
            normal / length
        } else {
            DVec3::ZERO
        }
    }

    /// Returns the area of a face.
    pub fn face_area(&self, index: usize) -> f64 {
        newell_normal(&self.face_positions(&self.faces[index])).length() * 0.5
    }

    /// Computes the axis-aligned bounding box of all vertices.
    ///
    /// Returns an empty box for a mesh without vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Returns true if any face carries texture coordinates.
    pub fn has_uvs(&self) -> bool {
        self.faces.iter().any(Face::has_uvs)
    }

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Transforms all vertices by a 4x4 matrix.
    ///
    /// A mirroring matrix (negative determinant) would turn the surface
    /// inside out, so face windings are reversed to keep normals outward.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
        if matrix.determinant() < 0.0 {
            self.flip_normals();
        }
    }

    /// Returns a transformed copy of this mesh.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let mut mesh = self.clone();
        mesh.transform(matrix);
        mesh
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Applies a function to every vertex position.
    pub fn map_positions(&mut self, mut f: impl FnMut(DVec3) -> DVec3) {
        for v in &mut self.vertices {
            *v = f(*v);
        }
    }

    /// Reverses the winding of every face.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
    }

    // =========================================================================
    // MATERIALS
    // =========================================================================

    /// Assigns one material slot to every face.
    pub fn set_material(&mut self, slot: u32) {
        for face in &mut self.faces {
            face.material = slot;
        }
    }

    /// Returns the highest material slot used by any face.
    pub fn max_material(&self) -> Option<u32> {
        self.faces.iter().map(|f| f.material).max()
    }

    /// Returns true if any face uses the given slot.
    pub fn uses_material(&self, slot: u32) -> bool {
        self.faces.iter().any(|f| f.material == slot)
    }

    /// Removes a material slot, shifting every higher slot down by one.
    ///
    /// Faces still using the removed slot are reassigned to slot 0.
    pub fn remove_material_slot(&mut self, slot: u32) {
        for face in &mut self.faces {
            if face.material > slot {
                face.material -= 1;
            } else if face.material == slot {
                face.material = 0;
            }
        }
    }

    // =========================================================================
    // TOPOLOGY EDITS
    // =========================================================================

    /// Keeps only the faces matching the predicate and drops vertices no
    /// remaining face references.
    ///
    /// Returns the number of faces removed.
    pub fn retain_faces(&mut self, mut keep: impl FnMut(&Face) -> bool) -> usize {
        let before = self.faces.len();
        self.faces.retain(|f| keep(f));
        let removed = before - self.faces.len();
        if removed > 0 {
            self.compact_vertices();
        }
        removed
    }

    /// Drops unreferenced vertices and renumbers faces accordingly.
    pub fn compact_vertices(&mut self) {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());

        for face in &mut self.faces {
            for index in &mut face.vertices {
                let slot = &mut remap[*index as usize];
                if *slot == u32::MAX {
                    *slot = vertices.len() as u32;
                    vertices.push(self.vertices[*index as usize]);
                }
                *index = *slot;
            }
        }

        self.vertices = vertices;
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        for face in &other.faces {
            let mut face = face.clone();
            for index in &mut face.vertices {
                *index += offset;
            }
            self.faces.push(face);
        }
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All face indices are valid
    /// - Every face has at least three loops
    /// - UV loops, when present, match the vertex loops
    pub fn validate(&self) -> MeshResult<()> {
        let count = self.vertices.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::invalid_topology(format!(
                    "face {} has {} vertices",
                    face_index,
                    face.len()
                )));
            }
            if let Some(&index) = face.vertices.iter().find(|&&i| i as usize >= count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    count,
                });
            }
            if !face.uvs.is_empty() && face.uvs.len() != face.len() {
                return Err(MeshError::invalid_topology(format!(
                    "face {} has {} loops but {} uvs",
                    face_index,
                    face.len(),
                    face.uvs.len()
                )));
            }
        }
        Ok(())
    }

    /// Returns true if the mesh cannot act as a boolean operand.
    ///
    /// A mesh is degenerate when it has fewer than three vertices or none of
    /// its faces encloses any area.
    pub fn is_degenerate(&self) -> bool {
        if self.vertices.len() < 3 {
            return true;
        }
        !(0..self.faces.len()).any(|i| self.face_area(i) > NORMAL_EPSILON)
    }

    /// Counts the connected pieces of surface (faces linked by shared vertices).
    pub fn connected_components(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.vertices.len()).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for face in &self.faces {
            let Some(&first) = face.vertices.first() else {
                continue;
            };
            for &other in &face.vertices[1..] {
                let a = find(&mut parent, first as usize);
                let b = find(&mut parent, other as usize);
                if a != b {
                    parent[b] = a;
                }
            }
        }

        let mut roots: Vec<usize> = self
            .faces
            .iter()
            .filter_map(|f| f.vertices.first())
            .map(|&v| find(&mut parent, v as usize))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }
}

// =============================================================================
// GEOMETRY HELPERS
// =============================================================================

/// Computes the (unnormalized) polygon normal with Newell's method.
///
/// The length of the result is twice the polygon area. Robust against
/// collinear leading vertices, unlike a cross product of the first edges.
pub fn newell_normal(points: &[DVec3]) -> DVec3 {
    let mut normal = DVec3::ZERO;
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.add_face(vec![0, 1, 2, 3], 0);
        mesh
    }

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_triangle_count_of_quad() {
        assert_eq!(unit_square().triangle_count(), 2);
    }

    #[test]
    fn test_face_normal_and_area() {
        let mesh = unit_square();
        assert_relative_eq!(mesh.face_normal(0).z, 1.0);
        assert_relative_eq!(mesh.face_area(0), 1.0);
    }

    #[test]
    fn test_flip_normals_reverses_uvs() {
        let mut mesh = unit_square();
        mesh.faces_mut()[0].uvs = vec![DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y];
        mesh.flip_normals();
        assert_relative_eq!(mesh.face_normal(0).z, -1.0);
        assert_eq!(mesh.face(0).uvs[0], DVec2::Y);
    }

    #[test]
    fn test_mirror_transform_keeps_orientation() {
        let mut mesh = unit_square();
        mesh.transform(&DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0)));
        // Mirrored in x, winding corrected: still facing +z
        assert_relative_eq!(mesh.face_normal(0).z, 1.0);
    }

    #[test]
    fn test_retain_faces_compacts_vertices() {
        let mut mesh = unit_square();
        let offset = mesh.add_vertex(DVec3::new(5.0, 5.0, 5.0));
        mesh.add_vertex(DVec3::new(6.0, 5.0, 5.0));
        mesh.add_vertex(DVec3::new(5.0, 6.0, 5.0));
        mesh.add_face(vec![offset, offset + 1, offset + 2], 1);

        let removed = mesh.retain_faces(|f| f.material != 0);
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face(0).vertices, vec![0, 1, 2]);
        assert_eq!(mesh.vertex(0), DVec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_remove_material_slot_shifts_higher_slots() {
        let mut mesh = unit_square();
        mesh.add_face(vec![0, 1, 2], 2);
        mesh.add_face(vec![0, 2, 3], 3);
        mesh.remove_material_slot(1);
        let materials: Vec<u32> = mesh.faces().iter().map(|f| f.material).collect();
        assert_eq!(materials, vec![0, 1, 2]);
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_face(vec![0, 1, 2], 0);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_is_degenerate() {
        assert!(Mesh::new().is_degenerate());
        assert!(!unit_square().is_degenerate());

        let mut collinear = Mesh::new();
        collinear.add_vertex(DVec3::ZERO);
        collinear.add_vertex(DVec3::X);
        collinear.add_vertex(DVec3::X * 2.0);
        collinear.add_face(vec![0, 1, 2], 0);
        assert!(collinear.is_degenerate());
    }

    #[test]
    fn test_connected_components() {
        let mut mesh = unit_square();
        assert_eq!(mesh.connected_components(), 1);

        let mut other = unit_square();
        other.translate(DVec3::new(10.0, 0.0, 0.0));
        mesh.merge(&other);
        assert_eq!(mesh.connected_components(), 2);
    }

    #[test]
    fn test_mesh_merge_offsets_indices() {
        let mut a = unit_square();
        let b = unit_square();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.face(1).vertices, vec![4, 5, 6, 7]);
    }
}
