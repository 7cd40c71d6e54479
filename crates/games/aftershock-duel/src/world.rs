use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier of an object in the host's scene.
pub type ObjectId = u32;

/// Tag carried by objects nobody tagged.
pub const UNTAGGED: &str = "Untagged";

/// Position and orientation of a world object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What an object is, as far as hazard selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Prop,
    Camera,
    Light,
    Player,
}

/// Physics capability an object declares in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub mass: f32,
}

/// Scene description of one object, as handed over by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub name: String,
    pub tag: String,
    pub kind: ObjectKind,
    pub parent: Option<ObjectId>,
    pub transform: Transform,
    pub body: Option<BodySpec>,
}

impl WorldObject {
    pub fn prop(id: ObjectId, name: &str, tag: &str, translation: Vec3) -> Self {
        Self {
            id,
            name: name.to_string(),
            tag: tag.to_string(),
            kind: ObjectKind::Prop,
            parent: None,
            transform: Transform::from_translation(translation),
            body: None,
        }
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_body(mut self, mass: f32) -> Self {
        self.body = Some(BodySpec { mass });
        self
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }
}
