//! Turns the scene's display list into textured quads, grouped into draw calls.

use std::ops::Range;

use glam::Vec2;

use crate::engine::assets::{TextureCache, MISSING_TEXTURE, WHITE_TEXTURE};
use crate::engine::graphics::vertex::{Vertex, QUAD_INDICES};
use crate::engine::scene::{GameObject, ObjectKind, Scene};

/// One draw call: a run of indices that all sample the same texture.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub texture: String,
    pub indices: Range<u32>,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub batches: Vec<DrawBatch>,
}

impl SpriteBatch {
    /// Builds vertices for an sRGB render target.
    pub fn build(scene: &Scene, textures: &TextureCache) -> Self {
        Self::build_with(scene, textures, true)
    }

    /// `linear` converts colours to linear space; pass `false` when the
    /// surface does not encode to sRGB on write.
    pub fn build_with(scene: &Scene, textures: &TextureCache, linear: bool) -> Self {
        let mut batch = SpriteBatch::default();
        for object in scene.display_list() {
            batch.push(object, textures, linear);
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    fn push(&mut self, object: &GameObject, textures: &TextureCache, linear: bool) {
        let (texture, frame, color) = match &object.kind {
            ObjectKind::Rectangle { fill } => {
                let white = textures.resolve(WHITE_TEXTURE);
                (white, Some(white.base_frame()), *fill)
            }
            ObjectKind::Image { texture, frame } | ObjectKind::Sprite { texture, frame } => {
                let texture = textures.resolve(texture);
                (texture, texture.frame(*frame), object.tint)
            }
        };
        // a frame index that no longer exists falls back to the placeholder
        let (texture, frame) = match frame {
            Some(frame) => (texture, frame),
            None => {
                let missing = textures.resolve(MISSING_TEXTURE);
                (missing, missing.base_frame())
            }
        };

        let [u0, v0, u1, v1] = frame.uv(texture.width(), texture.height());
        let min = object.top_left();
        let max = min + object.size;
        let color = color.to_rgba(linear);
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            vertex(Vec2::new(min.x, min.y), [u0, v0], color),
            vertex(Vec2::new(max.x, min.y), [u1, v0], color),
            vertex(Vec2::new(max.x, max.y), [u1, v1], color),
            vertex(Vec2::new(min.x, max.y), [u0, v1], color),
        ]);

        let start = self.indices.len() as u32;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        let end = self.indices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture.key => last.indices.end = end,
            _ => self.batches.push(DrawBatch {
                texture: texture.key.clone(),
                indices: start..end,
            }),
        }
    }
}

fn vertex(position: Vec2, tex_coords: [f32; 2], color: [f32; 4]) -> Vertex {
    Vertex {
        position: position.to_array(),
        tex_coords,
        color,
    }
}
