//! Error types shared by the engine layer and the game wrapper.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::scene::ObjectId;

/// Failures while reading or decoding a single asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("malformed data url: {0}")]
    MalformedDataUrl(String),
    #[error("unsupported url scheme in `{0}`")]
    UnsupportedScheme(String),
    #[error("spritesheet frame size must be non-zero, got {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
    #[error("spritesheet frame {frame_width}x{frame_height} with margin {margin} and spacing {spacing} overflows")]
    FrameGeometry {
        frame_width: u32,
        frame_height: u32,
        margin: u32,
        spacing: u32,
    },
    #[error("image is {width}x{height}, textures are limited to {max}x{max}")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("decoder panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("`{0}` needs the scene, which only exists from the create hook onward")]
    SceneNotCreated(&'static str),
    #[error("no game object with id {0:?}")]
    UnknownObject(ObjectId),
    #[error("game object {0:?} is not a sprite")]
    NotASprite(ObjectId),
    #[error("texture `{key}` has no frame {frame}")]
    UnknownFrame { key: String, frame: usize },
    #[error("{stage} hook failed: {source}")]
    Hook {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
