//! # Remove-Material Filter
//!
//! Deletes the faces composition tagged with the sentinel material and drops
//! the sentinel slot from the room's slot table.

use level_mesh::Mesh;

/// Output of [`strip_mask_faces`].
#[derive(Debug, Clone, PartialEq)]
pub struct Stripped {
    /// Mesh without sentinel faces
    pub mesh: Mesh,
    /// Slot table without sentinel slots; other indices are preserved
    pub slots: Vec<Option<String>>,
    /// Number of deleted faces
    pub removed: usize,
}

/// Removes every face whose slot names `remove_material`, then that slot.
///
/// Slots past a removed one shift down by one and face indices follow.
/// Vertices only the deleted faces used are dropped.
pub fn strip_mask_faces(mesh: &Mesh, slots: &[Option<String>], remove_material: &str) -> Stripped {
    let sentinel: Vec<u32> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.as_deref() == Some(remove_material))
        .map(|(i, _)| i as u32)
        .collect();

    let mut mesh = mesh.clone();
    let removed = mesh.retain_faces(|face| !sentinel.contains(&face.material));

    let mut slots = slots.to_vec();
    // Highest first so lower indices stay valid
    for &slot in sentinel.iter().rev() {
        mesh.remove_material_slot(slot);
        slots.remove(slot as usize);
    }

    Stripped {
        mesh,
        slots,
        removed,
    }
}
