//! # Level Mesh
//!
//! Geometry kernel for the level build pipeline: a polygon mesh with
//! per-face material slots and per-loop UVs, axis-aligned bounds, and the
//! boolean, shell and triangulation operations the pipeline composes rooms
//! with.
//!
//! ## Architecture
//!
//! ```text
//! level-build (shapes, masks) → level-mesh (Mesh, compose, solidify)
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust:
//! - **Boolean Operations**: BSP trees (csg.js algorithm)
//! - **Triangulation**: Ear clipping with robust predicates
//! - **Solidify**: Offset along area-weighted vertex normals
//!
//! ## Usage
//!
//! ```rust
//! use level_mesh::{compose, primitives::create_cube, BooleanOp};
//! use glam::DVec3;
//!
//! let room = create_cube(DVec3::splat(4.0), true).unwrap();
//! let mut crate_box = create_cube(DVec3::splat(2.0), true).unwrap();
//! crate_box.translate(DVec3::new(2.0, 0.0, 0.0));
//! let clipped = compose(&crate_box, &room, BooleanOp::Intersect).unwrap();
//! assert!(clipped.bounding_box().max.x <= 2.0 + 1e-9);
//! ```

pub mod bounds;
pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;

pub use bounds::BoundingBox;
pub use error::{MeshError, MeshResult};
pub use mesh::{Face, Mesh};
pub use ops::boolean::{compose, difference, intersection, union, BooleanOp};
pub use ops::solidify::{solidify, ShellMaterials};
pub use ops::triangulate::triangulate;
