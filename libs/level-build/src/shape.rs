//! # Shapes
//!
//! Authored volumetric primitives and their per-shape settings.

use config::constants::{
    DEFAULT_CEILING_HEIGHT, DEFAULT_FLOOR_HEIGHT, DEFAULT_TEXTURE_OFFSET,
    DEFAULT_TEXTURE_ROTATION, DEFAULT_TEXTURE_SCALE,
};
use glam::{DMat4, DQuat, DVec2, DVec3, EulerRot};
use level_mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable identifier of a shape within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// SHAPE KIND
// =============================================================================

/// Declared role of a shape in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Floor plan solidified into a hollow room shell
    #[serde(rename = "SECTOR2D")]
    Sector2D,
    /// Closed solid describing enclosed space
    #[serde(rename = "SECTOR3D")]
    Sector3D,
    /// Solid content placed inside rooms
    #[serde(rename = "BRUSH")]
    Brush,
}

impl ShapeKind {
    /// Returns true for shapes that describe enclosed space.
    pub fn is_enclosing(self) -> bool {
        matches!(self, ShapeKind::Sector2D | ShapeKind::Sector3D)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Sector2D => "SECTOR2D",
            ShapeKind::Sector3D => "SECTOR3D",
            ShapeKind::Brush => "BRUSH",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Object transform: location, XYZ Euler rotation (radians) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// World position
    pub location: DVec3,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: DVec3,
    /// Per-axis scale
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a translation-only transform.
    pub fn from_location(location: DVec3) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    /// Rotation as a quaternion.
    pub fn quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::ZYX, self.rotation.z, self.rotation.y, self.rotation.x)
    }

    /// Local-to-world matrix (`T * R * S`).
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.quat(), self.location)
    }
}

// =============================================================================
// TEXTURE SETTINGS
// =============================================================================

/// Texture group a face is mapped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureGroup {
    /// Vertical faces
    Wall,
    /// Downward faces
    Floor,
    /// Upward faces
    Ceiling,
}

impl TextureGroup {
    /// Every group, in slot order of a 2D sector (ceiling, floor, wall).
    pub const ALL: [TextureGroup; 3] = [TextureGroup::Ceiling, TextureGroup::Floor, TextureGroup::Wall];
}

/// Planar projection parameters of one texture group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    /// UV scale (x, y)
    pub scale: DVec2,
    /// UV offset (x, y)
    pub offset: DVec2,
    /// Rotation in degrees
    pub rotation: f64,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            scale: DVec2::from_array(DEFAULT_TEXTURE_SCALE),
            offset: DVec2::from_array(DEFAULT_TEXTURE_OFFSET),
            rotation: DEFAULT_TEXTURE_ROTATION,
        }
    }
}

/// Texture parameters for every group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// Wall parameters
    pub wall: TextureParams,
    /// Floor parameters
    pub floor: TextureParams,
    /// Ceiling parameters
    pub ceiling: TextureParams,
}

impl TextureSettings {
    /// Returns the parameters of one group.
    pub fn get(&self, group: TextureGroup) -> &TextureParams {
        match group {
            TextureGroup::Wall => &self.wall,
            TextureGroup::Floor => &self.floor,
            TextureGroup::Ceiling => &self.ceiling,
        }
    }

    /// Returns the parameters of one group for editing.
    pub fn get_mut(&mut self, group: TextureGroup) -> &mut TextureParams {
        match group {
            TextureGroup::Wall => &mut self.wall,
            TextureGroup::Floor => &mut self.floor,
            TextureGroup::Ceiling => &mut self.ceiling,
        }
    }
}

/// Material name chosen per texture group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMaterials {
    /// Wall material
    pub wall: Option<String>,
    /// Floor material
    pub floor: Option<String>,
    /// Ceiling material
    pub ceiling: Option<String>,
}

impl GroupMaterials {
    /// Returns the material name of one group.
    pub fn get(&self, group: TextureGroup) -> Option<&str> {
        match group {
            TextureGroup::Wall => self.wall.as_deref(),
            TextureGroup::Floor => self.floor.as_deref(),
            TextureGroup::Ceiling => self.ceiling.as_deref(),
        }
    }

    /// Iterates over every named material.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.wall, &self.floor, &self.ceiling]
            .into_iter()
            .filter_map(|name| name.as_deref())
    }
}

// =============================================================================
// SHAPE
// =============================================================================

/// A volumetric editor primitive.
///
/// `mesh` is local-space geometry; face material indices point into
/// `material_slots`. A shape with `kind == None` is ordinary scene content
/// the build ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Scene-assigned identifier
    pub id: ShapeId,
    /// Display name, also used to name the room
    pub name: String,
    /// Declared kind, `None` when the object is not a shape
    #[serde(default)]
    pub kind: Option<ShapeKind>,
    /// Object transform
    #[serde(default)]
    pub transform: Transform,
    /// Local geometry
    #[serde(default)]
    pub mesh: Mesh,
    /// Inner shell height of a 2D sector
    #[serde(default = "default_floor")]
    pub floor_height: f64,
    /// Outer shell height of a 2D sector
    #[serde(default = "default_ceiling")]
    pub ceiling_height: f64,
    /// Whether the room gets projected UVs
    #[serde(default = "default_true")]
    pub auto_texture: bool,
    /// Projection parameters per group
    #[serde(default)]
    pub textures: TextureSettings,
    /// Material chosen per group
    #[serde(default)]
    pub group_materials: GroupMaterials,
    /// Material slot table (`None` is an empty slot)
    #[serde(default)]
    pub material_slots: Vec<Option<String>>,
    /// Editor selection state
    #[serde(default)]
    pub selected: bool,
}

fn default_floor() -> f64 {
    DEFAULT_FLOOR_HEIGHT
}

fn default_ceiling() -> f64 {
    DEFAULT_CEILING_HEIGHT
}

fn default_true() -> bool {
    true
}

impl Shape {
    /// Creates a shape with default heights and texture settings.
    ///
    /// The id is a placeholder until the shape is added to a scene.
    pub fn new(name: impl Into<String>, kind: Option<ShapeKind>, mesh: Mesh) -> Self {
        Self {
            id: ShapeId(0),
            name: name.into(),
            kind,
            transform: Transform::default(),
            mesh,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            ceiling_height: DEFAULT_CEILING_HEIGHT,
            auto_texture: true,
            textures: TextureSettings::default(),
            group_materials: GroupMaterials::default(),
            material_slots: Vec::new(),
            selected: false,
        }
    }

    /// Sets the transform (builder style).
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets floor and ceiling heights (builder style).
    pub fn with_heights(mut self, floor: f64, ceiling: f64) -> Self {
        self.floor_height = floor;
        self.ceiling_height = ceiling;
        self
    }

    /// Returns true if the shape takes part in builds.
    pub fn is_shape(&self) -> bool {
        self.kind.is_some()
    }

    /// Whether the room of this shape gets projected UVs.
    ///
    /// 2D sectors are always textured; other kinds follow `auto_texture`.
    pub fn wants_texture(&self) -> bool {
        self.kind == Some(ShapeKind::Sector2D) || self.auto_texture
    }
}
