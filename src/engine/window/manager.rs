//! Window management implementation.

use std::sync::Arc;

use log::{error, info};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::engine::config::GameConfig;
use crate::engine::error::GameError;

#[derive(Default)]
pub struct WindowManager {
    window: Option<Arc<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a window sized to the logical canvas. Does nothing if one is already open.
    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: &GameConfig,
    ) -> Result<Arc<Window>, GameError> {
        if let Some(window) = &self.window {
            return Ok(window.clone());
        }
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));
        let window = event_loop.create_window(attributes).map_err(|e| {
            error!("Failed to create window: {:?}", e);
            e
        })?;
        info!("Created {}x{} window `{}`", config.width, config.height, config.title);

        let window = Arc::new(window);
        self.window = Some(window.clone());
        Ok(window)
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    pub fn get_window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }
}
