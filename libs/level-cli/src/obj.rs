//! Wavefront OBJ export of built rooms.

use level_build::Room;
use std::fmt::{self, Write};

/// Material name written for empty or missing slots.
const FALLBACK_MATERIAL: &str = "default";

/// Writes rooms as OBJ objects in world space.
///
/// Faces are grouped with `usemtl` by slot name; `vt` records are emitted
/// for faces that carry UVs.
pub fn write_obj<W: Write>(out: &mut W, rooms: &[&Room]) -> fmt::Result {
    writeln!(out, "# level export: {} rooms", rooms.len())?;

    let mut vertex_base = 1;
    let mut uv_base = 1;
    for room in rooms {
        let mesh = room.mesh.transformed(&room.transform.matrix());
        writeln!(out, "o {}", room.name)?;

        for v in mesh.vertices() {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        let mut uv_count = 0;
        for uv in mesh.faces().iter().flat_map(|f| &f.uvs) {
            writeln!(out, "vt {} {}", uv.x, uv.y)?;
            uv_count += 1;
        }

        let mut current = None;
        let mut next_uv = uv_base;
        for face in mesh.faces() {
            if current != Some(face.material) {
                let name = room
                    .material_slots
                    .get(face.material as usize)
                    .and_then(|slot| slot.as_deref())
                    .unwrap_or(FALLBACK_MATERIAL);
                writeln!(out, "usemtl {}", name)?;
                current = Some(face.material);
            }
            write!(out, "f")?;
            for &v in &face.vertices {
                if face.has_uvs() {
                    write!(out, " {}/{}", v as usize + vertex_base, next_uv)?;
                    next_uv += 1;
                } else {
                    write!(out, " {}", v as usize + vertex_base)?;
                }
            }
            writeln!(out)?;
        }

        vertex_base += mesh.vertex_count();
        uv_base += uv_count;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};
    use level_build::{RoomId, ShapeId, Transform};
    use level_mesh::Mesh;

    fn triangle_room(name: &str, with_uvs: bool) -> Room {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        let face = mesh.add_face(vec![0, 1, 2], 1);
        if with_uvs {
            mesh.faces_mut()[face].uvs = vec![DVec2::ZERO, DVec2::X, DVec2::Y];
        }
        Room {
            id: RoomId(0),
            name: name.into(),
            source: ShapeId(0),
            transform: Transform::from_location(DVec3::new(0.0, 0.0, 2.0)),
            mesh,
            material_slots: vec![None, Some("stone".into())],
        }
    }

    #[test]
    fn test_write_obj_offsets_indices() {
        let a = triangle_room("ble_a", true);
        let b = triangle_room("ble_b", false);
        let mut out = String::new();

        write_obj(&mut out, &[&a, &b]).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&"o ble_a"));
        assert!(lines.contains(&"usemtl stone"));
        assert!(lines.contains(&"v 0 0 2"));
        assert!(lines.contains(&"f 1/1 2/2 3/3"));
        assert!(lines.contains(&"f 4 5 6"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("vt ")).count(), 3);
    }

    #[test]
    fn test_write_obj_fallback_material() {
        let mut room = triangle_room("ble_a", false);
        room.material_slots.clear();
        let mut out = String::new();

        write_obj(&mut out, &[&room]).unwrap();

        assert!(out.contains("usemtl default"));
    }
}
