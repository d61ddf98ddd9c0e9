//! # Config Crate
//!
//! Centralized configuration constants for the level build pipeline.
//! Every magic number used by the mesh kernel and the build stages is
//! defined here so the crates agree on tolerances and defaults.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{quantize, DEFAULT_PRECISION};
//!
//! // Vertex coordinates are rounded to the scene precision before baking
//! let rounded = quantize(1.23456, DEFAULT_PRECISION);
//! assert_eq!(rounded, 1.235);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Host Compatible**: Defaults match the level editor's shape defaults
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
