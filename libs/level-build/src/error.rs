//! # Build Errors
//!
//! Error types for the level build pipeline.
//!
//! Steady-state anomalies (degenerate shapes, a missing sentinel material,
//! empty boolean operands) are recovered from and never surface here. These
//! variants cover violations of the host contract.

use crate::shape::ShapeId;
use level_mesh::MeshError;
use thiserror::Error;

/// Errors raised by the scene model and the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A shape id does not exist in the scene
    #[error("Unknown shape: {id}")]
    UnknownShape {
        /// The missing id
        id: ShapeId,
    },

    /// Two shapes share an id
    #[error("Duplicate shape id: {id}")]
    DuplicateShape {
        /// The repeated id
        id: ShapeId,
    },

    /// A collection name does not exist in the scene
    #[error("Unknown collection: {name}")]
    UnknownCollection {
        /// The missing collection
        name: String,
    },

    /// Precision outside the accepted range
    #[error("Precision {precision} exceeds maximum {max}")]
    InvalidPrecision {
        /// Requested precision
        precision: u32,
        /// Largest accepted precision
        max: u32,
    },

    /// Authored geometry of a shape is malformed
    #[error("Invalid geometry in shape '{shape}': {source}")]
    InvalidGeometry {
        /// Shape name
        shape: String,
        /// Underlying mesh error
        #[source]
        source: MeshError,
    },

    /// A boolean or mesh operation failed
    #[error("Mesh operation failed: {0}")]
    Mesh(#[from] MeshError),

    /// Scene JSON could not be read or written
    #[error("Scene serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BuildError {
    /// Creates an unknown collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection { name: name.into() }
    }

    /// Creates an invalid geometry error for a named shape.
    pub fn invalid_geometry(shape: impl Into<String>, source: MeshError) -> Self {
        Self::InvalidGeometry {
            shape: shape.into(),
            source,
        }
    }
}

/// Result type alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::UnknownShape { id: ShapeId(7) };
        assert_eq!(err.to_string(), "Unknown shape: #7");

        let err = BuildError::unknown_collection("BLE_MISSING");
        assert!(err.to_string().contains("BLE_MISSING"));

        let err = BuildError::InvalidPrecision { precision: 9, max: 6 };
        assert_eq!(err.to_string(), "Precision 9 exceeds maximum 6");
    }

    #[test]
    fn test_error_from_mesh_error() {
        let err: BuildError = MeshError::degenerate("flat").into();
        assert!(matches!(err, BuildError::Mesh(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuildError>();
    }
}
