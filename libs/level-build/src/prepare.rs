//! # Shape Preparation
//!
//! One-time normalization applied to authored shapes: coordinate rounding
//! and 2D sector slot layout.

use crate::materials::MaterialLibrary;
use crate::shape::{Shape, ShapeKind, TextureGroup};
use config::constants::{quantize, SECTOR_MATERIAL_SLOTS};

/// Slot a 2D sector shell part is assigned to.
pub fn sector_slot(group: TextureGroup) -> usize {
    match group {
        TextureGroup::Ceiling => 0,
        TextureGroup::Floor => 1,
        TextureGroup::Wall => 2,
    }
}

/// Rounds the shape's location and local vertices to `precision` places.
///
/// For 2D sectors the slot table is sized to `[ceiling, floor, wall]` and
/// each slot takes the group's material when the library knows it; other
/// slots are left as they were. Running it twice changes nothing.
pub fn prepare_shape(shape: &mut Shape, precision: u32, library: &MaterialLibrary) {
    let location = &mut shape.transform.location;
    *location = location.map(|c| quantize(c, precision));
    shape.mesh.map_positions(|p| p.map(|c| quantize(c, precision)));

    if shape.kind == Some(ShapeKind::Sector2D) {
        shape.material_slots.resize(SECTOR_MATERIAL_SLOTS, None);
        for group in TextureGroup::ALL {
            if let Some(name) = shape.group_materials.get(group) {
                if library.contains(name) {
                    shape.material_slots[sector_slot(group)] = Some(name.to_string());
                }
            }
        }
    }
}
