//! Asset loading and the texture cache.

pub mod cache;
pub mod loader;
pub mod source;
pub mod spritesheet;

pub use cache::{Texture, TextureCache, MISSING_TEXTURE, WHITE_TEXTURE};
pub use loader::{AssetKind, LoadFailure, LoadRequest, Loader, MAX_TEXTURE_DIMENSION};
pub use source::AssetSource;
pub use spritesheet::{Frame, SpritesheetConfig};
