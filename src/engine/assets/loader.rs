//! Background asset loading.
//!
//! Requests are queued with [`Loader::image`] / [`Loader::spritesheet`],
//! dispatched to the rayon pool by [`Loader::start`], and collected into the
//! [`TextureCache`] by [`Loader::poll`] once per frame.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::engine::assets::cache::{Texture, TextureCache};
use crate::engine::assets::source::AssetSource;
use crate::engine::assets::spritesheet::SpritesheetConfig;
use crate::engine::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Spritesheet(SpritesheetConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub key: String,
    pub url: String,
    pub kind: AssetKind,
}

#[derive(Debug)]
pub struct LoadFailure {
    pub key: String,
    pub url: String,
    pub error: AssetError,
}

type LoadResult = (LoadRequest, Result<Texture, AssetError>);

/// Largest texture side the renderer accepts (wgpu's default 2D limit).
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

pub struct Loader {
    base_path: Option<PathBuf>,
    queue: Vec<LoadRequest>,
    in_flight: HashSet<String>,
    failures: Vec<LoadFailure>,
    total: usize,
    finished: usize,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl Loader {
    pub fn new(base_path: Option<PathBuf>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            base_path,
            queue: Vec::new(),
            in_flight: HashSet::new(),
            failures: Vec::new(),
            total: 0,
            finished: 0,
            tx,
            rx,
        }
    }

    pub fn image(&mut self, key: &str, url: &str) -> bool {
        self.enqueue(LoadRequest {
            key: key.to_string(),
            url: url.to_string(),
            kind: AssetKind::Image,
        })
    }

    pub fn spritesheet(&mut self, key: &str, url: &str, config: SpritesheetConfig) -> bool {
        self.enqueue(LoadRequest {
            key: key.to_string(),
            url: url.to_string(),
            kind: AssetKind::Spritesheet(config),
        })
    }

    fn enqueue(&mut self, request: LoadRequest) -> bool {
        if TextureCache::is_reserved(&request.key) {
            warn!("[loader] `{}` is a reserved texture key, ignoring", request.key);
            return false;
        }
        if self.is_known(&request.key) {
            warn!("[loader] `{}` is already queued, ignoring", request.key);
            return false;
        }
        debug!("[loader] Queued `{}` from {}", request.key, request.url);
        self.queue.push(request);
        true
    }

    /// Whether `key` is waiting in the queue or currently decoding.
    pub fn is_known(&self, key: &str) -> bool {
        self.in_flight.contains(key) || self.queue.iter().any(|r| r.key == key)
    }

    /// Sends every queued request to the thread pool. Returns how many were started.
    pub fn start(&mut self) -> usize {
        let started = self.queue.len();
        if started == 0 {
            return 0;
        }
        info!("[loader] Loading {} file(s)", started);
        for request in self.queue.drain(..) {
            self.in_flight.insert(request.key.clone());
            self.total += 1;
            let tx = self.tx.clone();
            let base_path = self.base_path.clone();
            rayon::spawn(move || {
                // a panic escaping a rayon job aborts the process
                let result = panic::catch_unwind(AssertUnwindSafe(|| decode(&request, base_path)))
                    .unwrap_or_else(|payload| Err(AssetError::Panicked(panic_message(payload))));
                tx.send((request, result)).ok();
            });
        }
        started
    }

    /// Moves finished files into `cache` without blocking. Returns how many
    /// textures were added.
    pub fn poll(&mut self, cache: &mut TextureCache) -> usize {
        let mut added = 0;
        while let Ok(result) = self.rx.try_recv() {
            if self.complete(result, cache) {
                added += 1;
            }
        }
        added
    }

    /// Blocks until every started request has finished.
    pub fn wait(&mut self, cache: &mut TextureCache) -> usize {
        let mut added = 0;
        while !self.in_flight.is_empty() {
            match self.rx.recv() {
                Ok(result) => {
                    if self.complete(result, cache) {
                        added += 1;
                    }
                }
                Err(_) => break,
            }
        }
        added
    }

    fn complete(&mut self, (request, result): LoadResult, cache: &mut TextureCache) -> bool {
        self.in_flight.remove(&request.key);
        self.finished += 1;
        match result {
            Ok(texture) => cache.insert(texture),
            Err(error) => {
                error!("[loader] Failed to load `{}` from {}: {}", request.key, request.url, error);
                self.failures.push(LoadFailure {
                    key: request.key,
                    url: request.url,
                    error,
                });
                false
            }
        }
    }

    /// Nothing queued and nothing decoding.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Fraction of started files that have finished, 1.0 when nothing was started.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.finished as f32 / self.total as f32
        }
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }
}

fn decode(request: &LoadRequest, base_path: Option<PathBuf>) -> Result<Texture, AssetError> {
    let bytes = AssetSource::parse(&request.url)?.read(base_path.as_deref())?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    if image.width() > MAX_TEXTURE_DIMENSION || image.height() > MAX_TEXTURE_DIMENSION {
        return Err(AssetError::TooLarge {
            width: image.width(),
            height: image.height(),
            max: MAX_TEXTURE_DIMENSION,
        });
    }
    info!(
        "[texture] Loaded texture: {}x{} from {}",
        image.width(),
        image.height(),
        request.key
    );
    let texture = Texture::new(request.key.clone(), image);
    match request.kind {
        AssetKind::Image => Ok(texture),
        AssetKind::Spritesheet(config) => {
            let frames = config.slice(texture.width(), texture.height())?;
            if frames.is_empty() {
                warn!(
                    "[texture] Spritesheet `{}` frame {}x{} does not fit in {}x{}",
                    request.key,
                    config.frame_width,
                    config.frame_height,
                    texture.width(),
                    texture.height()
                );
            }
            Ok(texture.with_frames(frames))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn duplicate_and_reserved_keys_are_rejected() {
        let mut loader = Loader::new(None);
        assert!(loader.image("sky", "sky.png"));
        assert!(!loader.image("sky", "other.png"));
        assert!(!loader.image("__WHITE", "white.png"));
        assert!(loader.is_known("sky"));
    }

    #[test]
    fn loads_images_and_spritesheets() {
        let mut loader = Loader::new(None);
        let mut cache = TextureCache::new();
        loader.image("sky", &png_data_url(8, 4));
        loader.spritesheet("dude", &png_data_url(32, 16), SpritesheetConfig::new(8, 8));
        assert_eq!(loader.start(), 2);
        assert!(!loader.is_idle());

        assert_eq!(loader.wait(&mut cache), 2);
        assert!(loader.is_idle());
        assert_eq!(loader.progress(), 1.0);
        assert_eq!(cache.get("sky").unwrap().width(), 8);
        assert_eq!(cache.get("dude").unwrap().frames.len(), 8);
    }

    #[test]
    fn failures_do_not_stop_the_queue() {
        let mut loader = Loader::new(None);
        let mut cache = TextureCache::new();
        loader.image("broken", "data:image/png;base64,AAAA");
        loader.image("missing", "/definitely/not/here.png");
        loader.image("ok", &png_data_url(2, 2));
        loader.start();
        loader.wait(&mut cache);

        assert!(cache.contains("ok"));
        let mut failed: Vec<_> = loader.failures().iter().map(|f| f.key.as_str()).collect();
        failed.sort();
        assert_eq!(failed, vec!["broken", "missing"]);
        assert!(matches!(
            loader.failures().iter().find(|f| f.key == "missing").unwrap().error,
            AssetError::Io { .. }
        ));
    }

    #[test]
    fn bad_spritesheet_geometry_is_a_failure() {
        let mut loader = Loader::new(None);
        let mut cache = TextureCache::new();
        let url = png_data_url(16, 16);
        loader.spritesheet("wide", &url, SpritesheetConfig::new(8, 8).with_spacing(u32::MAX));
        loader.spritesheet("fine", &url, SpritesheetConfig::new(8, 8));
        loader.start();
        loader.wait(&mut cache);

        assert_eq!(loader.failures().len(), 1);
        assert_eq!(loader.failures()[0].key, "wide");
        assert!(matches!(loader.failures()[0].error, AssetError::FrameGeometry { .. }));
        assert_eq!(cache.get("fine").unwrap().frames.len(), 4);
        assert!(loader.is_idle());
    }

    #[test]
    fn images_over_the_texture_limit_are_rejected() {
        let mut loader = Loader::new(None);
        let mut cache = TextureCache::new();
        loader.image("strip", &png_data_url(MAX_TEXTURE_DIMENSION + 1, 1));
        loader.start();
        loader.wait(&mut cache);

        assert!(!cache.contains("strip"));
        assert!(matches!(
            loader.failures()[0].error,
            AssetError::TooLarge { width, max: MAX_TEXTURE_DIMENSION, .. } if width == MAX_TEXTURE_DIMENSION + 1
        ));
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload = panic::catch_unwind(|| panic!("bad header")).unwrap_err();
        assert_eq!(panic_message(payload), "bad header");
        let payload = panic::catch_unwind(|| panic!("frame {}", 3)).unwrap_err();
        assert_eq!(panic_message(payload), "frame 3");
    }

    #[test]
    fn progress_without_work_is_complete() {
        let loader = Loader::new(None);
        assert!(loader.is_idle());
        assert_eq!(loader.progress(), 1.0);
    }
}
