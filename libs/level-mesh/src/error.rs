//! # Mesh Errors
//!
//! Error types for mesh construction and mesh operations.

use thiserror::Error;

/// Errors that can occur while building or operating on meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology {
        /// Description of the problem
        message: String,
    },

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry {
        /// Description of the problem
        message: String,
    },

    /// A face references a vertex that does not exist
    #[error("Face {face} references vertex {index} but mesh has {count} vertices")]
    IndexOutOfRange {
        /// Offending face
        face: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the mesh
        count: usize,
    },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::degenerate("zero thickness");
        assert!(err.to_string().contains("Degenerate"));
        assert!(err.to_string().contains("zero thickness"));

        let err = MeshError::IndexOutOfRange {
            face: 2,
            index: 9,
            count: 4,
        };
        assert_eq!(
            err.to_string(),
            "Face 2 references vertex 9 but mesh has 4 vertices"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
