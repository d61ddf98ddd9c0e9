//! # Primitives
//!
//! Starting geometry for newly created shapes.

pub mod cube;
pub mod plane;

pub use cube::create_cube;
pub use plane::create_plane;
