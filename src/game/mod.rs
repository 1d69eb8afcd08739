//! The `ScratchGame` wrapper and the app that drives it.

pub mod app;
pub mod scratch_game;
pub mod state;

// Re-export commonly used types
pub use app::App;
pub use scratch_game::{Hook, Phase, ScratchGame, BACKGROUND_DEPTH};
pub use state::GameState;
