//! A small 2D game wrapper: load textures, swap the background, place
//! sprites, and hook into the preload / create / update lifecycle.

pub mod engine;
pub mod game;

// Re-export main types for convenience
pub use engine::{Color, GameConfig, GameError, ObjectId, SpritesheetConfig};
pub use game::ScratchGame;
