//! # Mesh Operations
//!
//! Boolean composition, shell generation and triangulation.

pub mod boolean;
pub mod solidify;
pub mod triangulate;

pub use boolean::{compose, difference, intersection, union, BooleanOp};
pub use solidify::{solidify, ShellMaterials};
pub use triangulate::triangulate;
