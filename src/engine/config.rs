//! Game configuration: canvas size, renderer mode, physics and loader settings.

use std::path::{Path, PathBuf};

use glam::Vec2;
use log::info;
use serde::Deserialize;

use crate::engine::color::Color;
use crate::engine::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Let wgpu pick the best available backend.
    #[default]
    Auto,
    Gl,
    Vulkan,
    Metal,
    Dx12,
    /// Run the lifecycle without a window or GPU.
    Headless,
}

impl RendererKind {
    pub fn backends(&self) -> wgpu::Backends {
        match self {
            RendererKind::Auto | RendererKind::Headless => wgpu::Backends::all(),
            RendererKind::Gl => wgpu::Backends::GL,
            RendererKind::Vulkan => wgpu::Backends::VULKAN,
            RendererKind::Metal => wgpu::Backends::METAL,
            RendererKind::Dx12 => wgpu::Backends::DX12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsSystem {
    #[default]
    Arcade,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    #[serde(with = "vec2")]
    pub gravity: Vec2,
    pub debug: bool,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub default: PhysicsSystem,
    pub arcade: ArcadeConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative asset paths are resolved against.
    pub base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub renderer: RendererKind,
    pub pixel_art: bool,
    pub background_color: Color,
    pub physics: PhysicsConfig,
    pub loader: LoaderConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Scratch Game".to_string(),
            width: 800,
            height: 600,
            renderer: RendererKind::Auto,
            pixel_art: false,
            background_color: Color::BLACK,
            physics: PhysicsConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl GameConfig {
    /// The fixed configuration every game starts from: the given canvas,
    /// automatic renderer selection and arcade physics with debug drawing off.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

mod vec2 {
    use glam::Vec2;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    struct Xy {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        let Xy { x, y } = Xy::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}
