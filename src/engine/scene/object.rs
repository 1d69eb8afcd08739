use glam::Vec2;

use crate::engine::color::Color;

/// Handle to an object in a [`Scene`](super::Scene). Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Image { texture: String, frame: Option<usize> },
    Sprite { texture: String, frame: Option<usize> },
    Rectangle { fill: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub kind: ObjectKind,
    pub position: Vec2,
    /// Displayed size in pixels.
    pub size: Vec2,
    /// Anchor inside the object, (0, 0) top-left to (1, 1) bottom-right.
    pub origin: Vec2,
    pub depth: f32,
    pub visible: bool,
    pub tint: Color,
}

impl GameObject {
    fn new(kind: ObjectKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            position,
            size,
            origin: Vec2::splat(0.5),
            depth: 0.0,
            visible: true,
            tint: Color::WHITE,
        }
    }

    pub fn image(texture: impl Into<String>, frame: Option<usize>, position: Vec2, size: Vec2) -> Self {
        Self::new(
            ObjectKind::Image {
                texture: texture.into(),
                frame,
            },
            position,
            size,
        )
    }

    pub fn sprite(texture: impl Into<String>, frame: Option<usize>, position: Vec2, size: Vec2) -> Self {
        Self::new(
            ObjectKind::Sprite {
                texture: texture.into(),
                frame,
            },
            position,
            size,
        )
    }

    pub fn rectangle(position: Vec2, size: Vec2, fill: Color) -> Self {
        Self::new(ObjectKind::Rectangle { fill }, position, size)
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Top-left corner once the origin is applied.
    pub fn top_left(&self) -> Vec2 {
        self.position - self.size * self.origin
    }

    pub fn texture_key(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Image { texture, .. } | ObjectKind::Sprite { texture, .. } => Some(texture),
            ObjectKind::Rectangle { .. } => None,
        }
    }

    pub fn is_sprite(&self) -> bool {
        matches!(self.kind, ObjectKind::Sprite { .. })
    }
}
