//! # Scene
//!
//! Host-side scene model: shapes, built rooms, materials and the named
//! collections linking them. This is the state a build reads from and writes
//! its rooms back into.

use crate::error::{BuildError, BuildResult};
use crate::materials::MaterialLibrary;
use crate::prepare::prepare_shape;
use crate::shape::{Shape, ShapeId, ShapeKind, Transform};
use config::constants::{
    DEFAULT_PRECISION, DEFAULT_REMOVE_MATERIAL, MAX_PRECISION, NEW_SHAPE_SIZE, ROOT_COLLECTION,
    SHAPES_COLLECTION,
};
use glam::DVec3;
use level_mesh::primitives::{create_cube, create_plane};
use level_mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// SETTINGS
// =============================================================================

/// Scene-wide build settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Decimal places coordinates are rounded to
    pub precision: u32,
    /// Name of the sentinel material marking mask faces
    pub remove_material: String,
    /// Invert enclosing rooms so they are seen from inside
    pub flip_normals: bool,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            remove_material: DEFAULT_REMOVE_MATERIAL.to_string(),
            flip_normals: true,
        }
    }
}

impl LevelSettings {
    /// Checks the settings against the accepted ranges.
    pub fn validate(&self) -> BuildResult<()> {
        if self.precision > MAX_PRECISION {
            return Err(BuildError::InvalidPrecision {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }

    /// Sentinel name, falling back to the default when left blank.
    pub fn remove_material_name(&self) -> &str {
        if self.remove_material.trim().is_empty() {
            DEFAULT_REMOVE_MATERIAL
        } else {
            &self.remove_material
        }
    }
}

// =============================================================================
// ROOMS
// =============================================================================

/// Identifier of a built room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Final per-shape output mesh.
///
/// `mesh` is in the local space of `transform`, which is copied from the
/// source shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Scene-assigned identifier
    pub id: RoomId,
    /// Display name (`ble_<shape name>`)
    pub name: String,
    /// Shape the room was built from
    pub source: ShapeId,
    /// Copy of the source transform
    pub transform: Transform,
    /// Composed geometry
    pub mesh: Mesh,
    /// Material slot table
    pub material_slots: Vec<Option<String>>,
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Named group of shapes and rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique name
    pub name: String,
    /// Linked shapes, in link order
    #[serde(default)]
    pub shapes: Vec<ShapeId>,
    /// Linked rooms, in link order
    #[serde(default)]
    pub rooms: Vec<RoomId>,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Counts of data removed by [`Scene::reclaim_unused`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclaimReport {
    /// Rooms no collection linked
    pub rooms: usize,
    /// Materials nothing referenced
    pub materials: usize,
}

impl ReclaimReport {
    /// Adds another report's counts to this one.
    pub fn absorb(&mut self, other: ReclaimReport) {
        self.rooms += other.rooms;
        self.materials += other.materials;
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// A level scene.
///
/// # Example
///
/// ```rust
/// use level_build::{Scene, ShapeKind};
///
/// let mut scene = Scene::new();
/// let id = scene.add_new_shape(ShapeKind::Sector2D).unwrap();
/// assert_eq!(scene.shape(id).unwrap().material_slots.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Build settings
    #[serde(default)]
    pub settings: LevelSettings,
    /// Material library
    #[serde(default)]
    pub materials: MaterialLibrary,
    #[serde(default)]
    shapes: Vec<Shape>,
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene holding only the root collection.
    pub fn new() -> Self {
        Self {
            settings: LevelSettings::default(),
            materials: MaterialLibrary::new(),
            shapes: Vec::new(),
            rooms: Vec::new(),
            collections: vec![Collection::new(ROOT_COLLECTION)],
            next_id: 0,
        }
    }

    // =========================================================================
    // SERIALIZATION
    // =========================================================================

    /// Loads a scene from JSON and checks it against the host contract.
    ///
    /// Shapes not linked to any collection are linked to the root.
    pub fn from_json(json: &str) -> BuildResult<Self> {
        let mut scene: Scene = serde_json::from_str(json)?;
        scene.settings.validate()?;

        let mut seen = HashSet::new();
        for shape in &scene.shapes {
            if !seen.insert(shape.id) {
                return Err(BuildError::DuplicateShape { id: shape.id });
            }
            shape
                .mesh
                .validate()
                .map_err(|e| BuildError::invalid_geometry(&shape.name, e))?;
        }

        if !scene.collections.iter().any(|c| c.name == ROOT_COLLECTION) {
            scene.collections.insert(0, Collection::new(ROOT_COLLECTION));
        }
        for collection in &scene.collections {
            if let Some(id) = collection.shapes.iter().find(|id| !seen.contains(*id)) {
                return Err(BuildError::UnknownShape { id: *id });
            }
        }
        let orphans: Vec<ShapeId> = scene
            .shapes
            .iter()
            .map(|s| s.id)
            .filter(|id| !scene.collections.iter().any(|c| c.shapes.contains(id)))
            .collect();
        scene.ensure_collection(ROOT_COLLECTION).shapes.extend(orphans);

        let max_shape = scene.shapes.iter().map(|s| s.id.0 + 1).max().unwrap_or(0);
        let max_room = scene.rooms.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        scene.next_id = scene.next_id.max(max_shape).max(max_room);

        log::debug!(
            "loaded scene: {} shapes, {} rooms, {} materials",
            scene.shapes.len(),
            scene.rooms.len(),
            scene.materials.len()
        );
        Ok(scene)
    }

    /// Serializes the scene as pretty-printed JSON.
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // =========================================================================
    // SHAPES
    // =========================================================================

    /// All shapes in insertion order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Looks a shape up by id.
    pub fn shape(&self, id: ShapeId) -> BuildResult<&Shape> {
        self.shapes
            .iter()
            .find(|s| s.id == id)
            .ok_or(BuildError::UnknownShape { id })
    }

    /// Looks a shape up by id for editing.
    pub fn shape_mut(&mut self, id: ShapeId) -> BuildResult<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(BuildError::UnknownShape { id })
    }

    /// Looks a shape up by name.
    pub fn find_shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    /// Adds a shape, assigns it a fresh id and links it to `collection`.
    pub fn add_shape(&mut self, mut shape: Shape, collection: &str) -> BuildResult<ShapeId> {
        shape
            .mesh
            .validate()
            .map_err(|e| BuildError::invalid_geometry(&shape.name, e))?;
        let id = ShapeId(self.allocate_id());
        shape.id = id;
        self.shapes.push(shape);
        self.ensure_collection(collection).shapes.push(id);
        Ok(id)
    }

    /// Creates a default shape of the given kind in the shapes collection.
    ///
    /// 2D sectors start from a square plane, other kinds from a cube. The
    /// shape is prepared (quantized, slots sized) right away.
    pub fn add_new_shape(&mut self, kind: ShapeKind) -> BuildResult<ShapeId> {
        let mesh = match kind {
            ShapeKind::Sector2D => create_plane(NEW_SHAPE_SIZE),
            ShapeKind::Sector3D | ShapeKind::Brush => {
                create_cube(DVec3::splat(NEW_SHAPE_SIZE), true)?
            }
        };
        let id = self.add_shape(Shape::new(kind.to_string(), Some(kind), mesh), SHAPES_COLLECTION)?;

        let precision = self.settings.precision;
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(BuildError::UnknownShape { id })?;
        prepare_shape(shape, precision, &self.materials);
        log::info!("created {} shape {}", kind, id);
        Ok(id)
    }

    /// Ids of shapes the editor has selected.
    pub fn selected_shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().filter(|s| s.selected).map(|s| s.id)
    }

    // =========================================================================
    // COLLECTIONS
    // =========================================================================

    /// All collections; the root comes first.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Looks a collection up by name.
    pub fn collection(&self, name: &str) -> BuildResult<&Collection> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| BuildError::unknown_collection(name))
    }

    /// Returns the named collection, creating it when missing.
    pub fn ensure_collection(&mut self, name: &str) -> &mut Collection {
        let index = match self.collections.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.collections.push(Collection::new(name));
                self.collections.len() - 1
            }
        };
        &mut self.collections[index]
    }

    /// Links a shape into a collection (no-op if already linked).
    pub fn link_shape(&mut self, id: ShapeId, collection: &str) -> BuildResult<()> {
        self.shape(id)?;
        let target = self.ensure_collection(collection);
        if !target.shapes.contains(&id) {
            target.shapes.push(id);
        }
        Ok(())
    }

    /// Unlinks a shape from every collection.
    pub fn unlink_shape(&mut self, id: ShapeId) {
        for collection in &mut self.collections {
            collection.shapes.retain(|&s| s != id);
        }
    }

    /// Names of the collections a shape is linked to.
    pub fn shape_collections(&self, id: ShapeId) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| c.shapes.contains(&id))
            .map(|c| c.name.as_str())
            .collect()
    }

    // =========================================================================
    // ROOMS
    // =========================================================================

    /// All rooms, linked or not.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Looks a room up by id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Rooms linked into `collection`, in link order.
    pub fn linked_rooms(&self, collection: &str) -> BuildResult<Vec<&Room>> {
        let collection = self.collection(collection)?;
        Ok(collection
            .rooms
            .iter()
            .filter_map(|&id| self.room(id))
            .collect())
    }

    /// The linked room built from `shape`, if any.
    pub fn room_of(&self, shape: ShapeId) -> Option<&Room> {
        self.rooms
            .iter()
            .filter(|r| r.source == shape)
            .find(|r| self.collections.iter().any(|c| c.rooms.contains(&r.id)))
    }

    /// Stores a room under a fresh id and links it to `collection`.
    pub fn add_room(&mut self, mut room: Room, collection: &str) -> RoomId {
        let id = RoomId(self.allocate_id());
        room.id = id;
        self.rooms.push(room);
        self.ensure_collection(collection).rooms.push(id);
        id
    }

    /// Unlinks from `collection` every room whose source matches `filter`.
    ///
    /// Returns the number of unlinked rooms. The rooms stay in the scene
    /// until [`Scene::reclaim_unused`] runs.
    pub fn unlink_rooms(
        &mut self,
        collection: &str,
        mut filter: impl FnMut(ShapeId) -> bool,
    ) -> usize {
        let sources: Vec<(RoomId, ShapeId)> = self.rooms.iter().map(|r| (r.id, r.source)).collect();
        let Some(target) = self.collections.iter_mut().find(|c| c.name == collection) else {
            return 0;
        };
        let before = target.rooms.len();
        target.rooms.retain(|id| {
            let source = sources.iter().find(|(room, _)| room == id).map(|(_, s)| *s);
            !source.is_some_and(&mut filter)
        });
        before - target.rooms.len()
    }

    // =========================================================================
    // RECLAIM
    // =========================================================================

    /// Removes rooms no collection links and materials nothing references.
    ///
    /// Material users are shape slots, shape group materials and the slots
    /// of remaining rooms. Protected materials are kept regardless.
    pub fn reclaim_unused(&mut self) -> ReclaimReport {
        let linked: HashSet<RoomId> = self
            .collections
            .iter()
            .flat_map(|c| c.rooms.iter().copied())
            .collect();
        let before = self.rooms.len();
        self.rooms.retain(|r| linked.contains(&r.id));
        let rooms = before - self.rooms.len();

        let mut used: HashSet<&str> = HashSet::new();
        for shape in &self.shapes {
            used.extend(shape.material_slots.iter().flatten().map(String::as_str));
            used.extend(shape.group_materials.names());
        }
        for room in &self.rooms {
            used.extend(room.material_slots.iter().flatten().map(String::as_str));
        }
        let used: HashSet<String> = used.into_iter().map(str::to_string).collect();
        let materials = self.materials.retain_used(|name| used.contains(name)).len();

        if rooms > 0 || materials > 0 {
            log::debug!("reclaimed {} rooms and {} materials", rooms, materials);
        }
        ReclaimReport { rooms, materials }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Material;
    use config::constants::LEVEL_COLLECTION;

    fn room_for(source: ShapeId, slots: Vec<Option<String>>) -> Room {
        Room {
            id: RoomId(0),
            name: "ble_test".into(),
            source,
            transform: Transform::default(),
            mesh: Mesh::new(),
            material_slots: slots,
        }
    }

    #[test]
    fn test_new_scene_has_root() {
        let scene = Scene::new();
        assert_eq!(scene.collections()[0].name, ROOT_COLLECTION);
        assert!(scene.settings.flip_normals);
        assert_eq!(scene.settings.precision, 3);
    }

    #[test]
    fn test_add_new_shape_kinds() {
        let mut scene = Scene::new();
        let sector = scene.add_new_shape(ShapeKind::Sector2D).unwrap();
        let brush = scene.add_new_shape(ShapeKind::Brush).unwrap();

        assert_eq!(scene.shape(sector).unwrap().mesh.vertex_count(), 4);
        assert_eq!(scene.shape(brush).unwrap().mesh.vertex_count(), 8);
        assert_ne!(sector, brush);
        assert_eq!(scene.shape_collections(sector), vec![SHAPES_COLLECTION]);
        assert_eq!(scene.shape(brush).unwrap().name, "BRUSH");
    }

    #[test]
    fn test_unknown_lookups() {
        let scene = Scene::new();
        assert!(matches!(
            scene.shape(ShapeId(42)),
            Err(BuildError::UnknownShape { .. })
        ));
        assert!(matches!(
            scene.collection("nope"),
            Err(BuildError::UnknownCollection { .. })
        ));
    }

    #[test]
    fn test_link_and_unlink_shape() {
        let mut scene = Scene::new();
        let id = scene.add_new_shape(ShapeKind::Brush).unwrap();
        scene.link_shape(id, ROOT_COLLECTION).unwrap();
        scene.link_shape(id, ROOT_COLLECTION).unwrap();
        assert_eq!(scene.shape_collections(id).len(), 2);

        scene.unlink_shape(id);
        assert!(scene.shape_collections(id).is_empty());
        assert!(scene.link_shape(ShapeId(99), ROOT_COLLECTION).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut scene = Scene::new();
        scene.add_new_shape(ShapeKind::Sector2D).unwrap();
        scene.settings.precision = 2;

        let json = scene.to_json().unwrap();
        let loaded = Scene::from_json(&json).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_from_json_rejects_bad_precision() {
        let json = r#"{"settings": {"precision": 9}}"#;
        assert!(matches!(
            Scene::from_json(json),
            Err(BuildError::InvalidPrecision { precision: 9, .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_geometry() {
        let json = r#"{"shapes": [{"id": 0, "name": "broken", "kind": "BRUSH",
            "mesh": {"vertices": [[0,0,0]], "faces": [{"vertices": [0, 1, 2]}]}}]}"#;
        assert!(matches!(
            Scene::from_json(json),
            Err(BuildError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"{"shapes": [{"id": 1, "name": "a"}, {"id": 1, "name": "b"}]}"#;
        assert!(matches!(
            Scene::from_json(json),
            Err(BuildError::DuplicateShape { .. })
        ));
    }

    #[test]
    fn test_from_json_links_orphans_to_root() {
        let json = r#"{"shapes": [{"id": 5, "name": "a", "kind": "BRUSH"}]}"#;
        let mut scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.collection(ROOT_COLLECTION).unwrap().shapes, vec![ShapeId(5)]);
        // Fresh ids never collide with loaded ones
        let id = scene.add_new_shape(ShapeKind::Brush).unwrap();
        assert_eq!(id, ShapeId(6));
    }

    #[test]
    fn test_reclaim_unused() {
        let mut scene = Scene::new();
        scene.materials.insert(Material::new("brick"));
        scene.materials.insert(Material::new("stone"));
        scene.materials.insert(Material::new("orphan"));
        scene.materials.ensure_remove_material("ble_remove");

        let id = scene.add_new_shape(ShapeKind::Brush).unwrap();
        scene.shape_mut(id).unwrap().group_materials.wall = Some("brick".into());

        let kept = scene.add_room(room_for(id, vec![Some("stone".into())]), LEVEL_COLLECTION);
        let dropped = scene.add_room(room_for(id, vec![Some("orphan".into())]), LEVEL_COLLECTION);
        scene.ensure_collection(LEVEL_COLLECTION).rooms.retain(|&r| r != dropped);

        let report = scene.reclaim_unused();

        assert_eq!(report, ReclaimReport { rooms: 1, materials: 1 });
        assert!(scene.room(kept).is_some());
        assert!(scene.room(dropped).is_none());
        assert!(scene.materials.contains("brick"));
        assert!(scene.materials.contains("stone"));
        assert!(scene.materials.contains("ble_remove"));
        assert!(!scene.materials.contains("orphan"));
    }

    #[test]
    fn test_unlink_rooms_by_source() {
        let mut scene = Scene::new();
        let a = scene.add_new_shape(ShapeKind::Brush).unwrap();
        let b = scene.add_new_shape(ShapeKind::Brush).unwrap();
        scene.add_room(room_for(a, vec![]), LEVEL_COLLECTION);
        scene.add_room(room_for(b, vec![]), LEVEL_COLLECTION);

        assert_eq!(scene.unlink_rooms(LEVEL_COLLECTION, |s| s == a), 1);
        assert!(scene.room_of(a).is_none());
        assert!(scene.room_of(b).is_some());
        assert_eq!(scene.unlink_rooms("missing", |_| true), 0);
    }

    #[test]
    fn test_blank_remove_material_falls_back() {
        let settings = LevelSettings {
            remove_material: "  ".into(),
            ..LevelSettings::default()
        };
        assert_eq!(settings.remove_material_name(), DEFAULT_REMOVE_MATERIAL);
    }
}
