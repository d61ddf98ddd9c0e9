//! # Vertex for BSP Operations
//!
//! Position plus texture coordinate, interpolated together when a polygon
//! is split.

use glam::{DVec2, DVec3};

// =============================================================================
// VERTEX
// =============================================================================

/// Polygon corner used by the BSP tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: DVec3,
    /// Texture coordinate (zero when the source face had none).
    pub uv: DVec2,
}

impl Vertex {
    /// Create an untextured vertex.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            uv: DVec2::ZERO,
        }
    }

    /// Create a vertex with a texture coordinate.
    pub fn with_uv(position: DVec3, uv: DVec2) -> Self {
        Self { position, uv }
    }

    /// Linear interpolation between two vertices.
    ///
    /// ## Parameters
    ///
    /// - `other`: Target vertex
    /// - `t`: Interpolation factor (0.0 = self, 1.0 = other)
    pub fn lerp(&self, other: &Vertex, t: f64) -> Vertex {
        Vertex {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
