//! The engine layer the game wrapper delegates to: configuration, assets,
//! scene graph, rendering and window management.

pub mod assets;
pub mod color;
pub mod config;
pub mod error;
pub mod graphics;
pub mod scene;
pub mod window;

// Re-export commonly used types
pub use assets::{Loader, SpritesheetConfig, Texture, TextureCache};
pub use color::Color;
pub use config::{GameConfig, RendererKind};
pub use error::{AssetError, ConfigError, GameError};
pub use graphics::{Renderer, SpriteBatch};
pub use scene::{GameObject, ObjectId, Scene};
pub use window::WindowManager;
