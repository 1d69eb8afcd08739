use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use log::{debug, warn};

use crate::engine::assets::spritesheet::Frame;

/// Placeholder drawn for keys that were never loaded.
pub const MISSING_TEXTURE: &str = "__MISSING";
/// Solid white pixel block used to draw filled shapes.
pub const WHITE_TEXTURE: &str = "__WHITE";

const MISSING_SIZE: u32 = 32;

/// A decoded texture and the frames cut from it.
#[derive(Debug, Clone)]
pub struct Texture {
    pub key: String,
    pub image: RgbaImage,
    pub frames: Vec<Frame>,
}

impl Texture {
    pub fn new(key: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            key: key.into(),
            image,
            frames: Vec::new(),
        }
    }

    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The whole image as one frame.
    pub fn base_frame(&self) -> Frame {
        Frame::new(0, 0, self.width(), self.height())
    }

    /// Frame shown when no frame is requested: the first sliced frame for
    /// spritesheets, nothing (whole image) otherwise.
    pub fn default_frame(&self) -> Option<usize> {
        if self.frames.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Resolves an optional frame index; `None` is the whole image.
    pub fn frame(&self, index: Option<usize>) -> Option<Frame> {
        match index {
            None => Some(self.base_frame()),
            Some(index) => self.frames.get(index).copied(),
        }
    }
}

pub struct TextureCache {
    textures: HashMap<String, Texture>,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCache {
    pub fn new() -> Self {
        let mut textures = HashMap::new();
        textures.insert(MISSING_TEXTURE.to_string(), missing_texture());
        textures.insert(
            WHITE_TEXTURE.to_string(),
            Texture::new(WHITE_TEXTURE, RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]))),
        );
        Self { textures }
    }

    pub fn is_reserved(key: &str) -> bool {
        key == MISSING_TEXTURE || key == WHITE_TEXTURE
    }

    /// Adds a texture. Keys are never overwritten; returns `false` when the
    /// key is already in use.
    pub fn insert(&mut self, texture: Texture) -> bool {
        if self.textures.contains_key(&texture.key) {
            warn!("[texture] Key `{}` already in use, ignoring", texture.key);
            return false;
        }
        debug!(
            "[texture] Cached `{}` ({}x{}, {} frames)",
            texture.key,
            texture.width(),
            texture.height(),
            texture.frames.len()
        );
        self.textures.insert(texture.key.clone(), texture);
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<Texture> {
        if Self::is_reserved(key) {
            return None;
        }
        self.textures.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Looks up `key`, falling back to the missing-texture placeholder.
    pub fn resolve(&self, key: &str) -> &Texture {
        match self.textures.get(key) {
            Some(texture) => texture,
            None => {
                warn!("[texture] Texture `{}` not found, using {}", key, MISSING_TEXTURE);
                &self.textures[MISSING_TEXTURE]
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.values()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

// Transparent square with a green outline and a cross, easy to spot on screen.
fn missing_texture() -> Texture {
    let green = Rgba([0, 255, 0, 255]);
    let last = MISSING_SIZE - 1;
    let image = RgbaImage::from_fn(MISSING_SIZE, MISSING_SIZE, |x, y| {
        if x == 0 || y == 0 || x == last || y == last || x == y || x + y == last {
            green
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    Texture::new(MISSING_TEXTURE, image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(key: &str, width: u32, height: u32) -> Texture {
        Texture::new(key, RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255])))
    }

    #[test]
    fn starts_with_builtins() {
        let cache = TextureCache::new();
        assert!(cache.contains(MISSING_TEXTURE));
        assert!(cache.contains(WHITE_TEXTURE));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn keys_are_never_overwritten() {
        let mut cache = TextureCache::new();
        assert!(cache.insert(solid("sky", 8, 8)));
        assert!(!cache.insert(solid("sky", 16, 16)));
        assert_eq!(cache.get("sky").unwrap().width(), 8);
    }

    #[test]
    fn unknown_keys_resolve_to_placeholder() {
        let cache = TextureCache::new();
        assert_eq!(cache.resolve("nope").key, MISSING_TEXTURE);
    }

    #[test]
    fn builtins_cannot_be_removed() {
        let mut cache = TextureCache::new();
        assert!(cache.remove(WHITE_TEXTURE).is_none());
        cache.insert(solid("sky", 2, 2));
        assert!(cache.remove("sky").is_some());
        assert!(!cache.contains("sky"));
    }

    #[test]
    fn default_frame_depends_on_slicing() {
        let image = solid("img", 16, 8);
        assert_eq!(image.default_frame(), None);
        assert_eq!(image.frame(None), Some(Frame::new(0, 0, 16, 8)));

        let sheet = solid("sheet", 16, 8)
            .with_frames(vec![Frame::new(0, 0, 8, 8), Frame::new(8, 0, 8, 8)]);
        assert_eq!(sheet.default_frame(), Some(0));
        assert_eq!(sheet.frame(Some(1)), Some(Frame::new(8, 0, 8, 8)));
        assert_eq!(sheet.frame(Some(2)), None);
    }
}
