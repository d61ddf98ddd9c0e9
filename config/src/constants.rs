//! # Configuration Constants
//!
//! Centralized constants for the level build pipeline. Geometry tolerances,
//! shape defaults, and host naming conventions are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Coordinate quantization and floating-point tolerances
//! - **Broad Phase**: Bounding-box margins for the intersection graph
//! - **Shape Defaults**: Values assigned to freshly created shapes
//! - **Host Naming**: Collection names, room prefix, sentinel material

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Default number of decimal places shape coordinates are rounded to.
///
/// A precision of 1 rounds `1.234` to `1.2`, a precision of 2 to `1.23`.
///
/// # Example
///
/// ```rust
/// use config::constants::{quantize, DEFAULT_PRECISION};
///
/// assert_eq!(quantize(0.0004, DEFAULT_PRECISION), 0.0);
/// ```
pub const DEFAULT_PRECISION: u32 = 3;

/// Largest precision the host accepts.
pub const MAX_PRECISION: u32 = 6;

/// Epsilon for classifying points against BSP splitting planes.
///
/// Points closer than this to a plane are treated as lying on it. Must stay
/// well below the quantization step of [`MAX_PRECISION`] so that shared
/// boundaries between quantized shapes classify as coplanar.
pub const PLANE_EPSILON: f64 = 1e-7;

/// Epsilon for vertex welding after boolean operations.
///
/// Vertices closer than this are merged into one so that faces produced by
/// polygon splitting share vertices again.
pub const VERTEX_MERGE_EPSILON: f64 = 1e-6;

/// Epsilon below which a face normal is considered degenerate.
pub const NORMAL_EPSILON: f64 = 1e-12;

// =============================================================================
// BROAD PHASE CONSTANTS
// =============================================================================

/// Margin added to every side of a mask bounding box.
///
/// Shapes that share an exact boundary must still be recorded as adjacent,
/// so boxes are grown before the overlap test. False positives are harmless
/// (the boolean against a disjoint operand changes nothing), false negatives
/// leave interior walls in the output.
///
/// # Example
///
/// ```rust
/// use config::constants::BOUNDS_MARGIN;
///
/// // Two unit boxes touching at x = 1 still overlap once expanded
/// let max_a = 1.0 + BOUNDS_MARGIN;
/// let min_b = 1.0 - BOUNDS_MARGIN;
/// assert!(min_b <= max_a);
/// ```
pub const BOUNDS_MARGIN: f64 = 0.01;

// =============================================================================
// SHAPE DEFAULTS
// =============================================================================

/// Ceiling height given to new shapes.
pub const DEFAULT_CEILING_HEIGHT: f64 = 4.0;

/// Floor height given to new shapes.
pub const DEFAULT_FLOOR_HEIGHT: f64 = 0.0;

/// Default texture scale (x, y) for every texture group.
pub const DEFAULT_TEXTURE_SCALE: [f64; 2] = [1.0, 1.0];

/// Default texture offset (x, y) for every texture group.
pub const DEFAULT_TEXTURE_OFFSET: [f64; 2] = [0.0, 0.0];

/// Default texture rotation in degrees.
pub const DEFAULT_TEXTURE_ROTATION: f64 = 0.0;

/// Edge length of the plane or cube created for a new shape.
pub const NEW_SHAPE_SIZE: f64 = 2.0;

/// Number of material slots a 2D sector carries: ceiling, floor, wall.
pub const SECTOR_MATERIAL_SLOTS: usize = 3;

// =============================================================================
// HOST NAMING
// =============================================================================

/// Collection receiving the built rooms.
pub const LEVEL_COLLECTION: &str = "BLE_LEVEL";

/// Collection every discovered shape is relinked into.
pub const SHAPES_COLLECTION: &str = "BLE_SHAPES";

/// Name of the scene root collection.
pub const ROOT_COLLECTION: &str = "Scene Collection";

/// Prefix prepended to a shape name to form its room name.
pub const ROOM_NAME_PREFIX: &str = "ble_";

/// Name of the sentinel material created when none is configured.
pub const DEFAULT_REMOVE_MATERIAL: &str = "ble_remove";

/// Display colour of an auto-created sentinel material (magenta).
///
/// RGBA values in range [0.0, 1.0].
pub const REMOVE_MATERIAL_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Colour of materials created without an explicit colour (light gray).
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Rounds a coordinate to `precision` decimal places.
///
/// Precision above [`MAX_PRECISION`] is clamped. Quantization is idempotent:
/// rounding an already rounded value returns it unchanged.
///
/// # Example
///
/// ```rust
/// use config::constants::quantize;
///
/// assert_eq!(quantize(1.234, 1), 1.2);
/// assert_eq!(quantize(1.234, 2), 1.23);
/// assert_eq!(quantize(quantize(1.234, 2), 2), 1.23);
/// ```
#[inline]
pub fn quantize(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 so serialized output is stable
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
