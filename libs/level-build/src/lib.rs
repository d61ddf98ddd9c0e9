//! # Level Build
//!
//! Compiles a scene of sector and brush shapes into one room mesh per shape.
//!
//! ## Architecture
//!
//! ```text
//! Scene → ShapeRegistry → MaskArena → IntersectionGraph → Composer
//!       → strip_mask_faces → triangulate → project → Room
//! ```
//!
//! Sectors (`Sector2D`, `Sector3D`) describe enclosed space. Each one is
//! unioned with the masks of its neighbors so adjoining rooms fuse into one
//! surface, then inverted to face inward. Brushes are solid content: they
//! are unioned with neighboring brushes and clipped to the union of all
//! sectors. A level without sectors keeps no brush geometry.
//!
//! ## Orientation
//!
//! Shells are composed facing outward, since the boolean kernel needs
//! outward solids. The single inversion at the end of a room's build
//! (`flip_normals`, on by default) leaves the finished sector room facing
//! inward, toward a viewer standing inside it. The room is therefore
//! delivered in its render orientation, not in the outward orientation it
//! was composed in. With `flip_normals` off the outward shell is kept.
//!
//! ## Usage
//!
//! ```rust
//! use level_build::{build, BuildOptions, Scene, ShapeKind};
//!
//! let mut scene = Scene::new();
//! let id = scene.add_new_shape(ShapeKind::Sector2D).unwrap();
//! let report = build(&mut scene, BuildOptions::default()).unwrap();
//!
//! assert_eq!(report.rooms_built, 1);
//! assert_eq!(scene.room_of(id).unwrap().material_slots.len(), 3);
//! ```

pub mod build;
pub mod compose;
pub mod error;
pub mod filter;
pub mod graph;
pub mod mask;
pub mod materials;
pub mod prepare;
pub mod registry;
pub mod scene;
pub mod shape;
pub mod texture;

pub use build::{build, BuildOptions, BuildReport};
pub use compose::Composer;
pub use error::{BuildError, BuildResult};
pub use filter::{strip_mask_faces, Stripped};
pub use graph::IntersectionGraph;
pub use mask::{evaluate, evaluate_world, Mask, MaskArena};
pub use materials::{Material, MaterialLibrary};
pub use prepare::prepare_shape;
pub use registry::ShapeRegistry;
pub use scene::{Collection, LevelSettings, ReclaimReport, Room, RoomId, Scene};
pub use shape::{
    GroupMaterials, Shape, ShapeId, ShapeKind, TextureGroup, TextureParams, TextureSettings,
    Transform,
};
pub use texture::{dominant_axis, project, Axis, Direction};
