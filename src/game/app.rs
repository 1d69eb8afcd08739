use std::time::{Duration, Instant};

use log::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::engine::error::GameError;
use crate::engine::graphics::{Renderer, SpriteBatch};
use crate::engine::window::WindowManager;
use crate::game::scratch_game::ScratchGame;

/// Fixed step used when there is no window to pace frames.
const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

/// Drives a [`ScratchGame`] from the winit event loop and draws its scene.
pub struct App {
    game: ScratchGame,
    window_manager: WindowManager,
    renderer: Option<Renderer>,
    last_frame: Option<Instant>,
    error: Option<GameError>,
}

impl App {
    pub fn new(game: ScratchGame) -> Self {
        Self {
            game,
            window_manager: WindowManager::new(),
            renderer: None,
            last_frame: None,
            error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GameError> {
        let window = self.window_manager.create_window(event_loop, self.game.config())?;
        let renderer = pollster::block_on(Renderer::new(window, self.game.config()))?;
        self.renderer = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: GameError) {
        error!("{}", e);
        self.error = Some(e);
        event_loop.exit();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta = self.last_frame.map_or(Duration::ZERO, |last| now - last);
        self.last_frame = Some(now);

        if let Err(e) = self.game.step(delta) {
            self.fail(event_loop, e);
            return;
        }
        if self.game.is_exit_requested() {
            event_loop.exit();
            return;
        }

        if let Some(renderer) = &mut self.renderer {
            renderer.sync_textures(self.game.textures());
            let batch = SpriteBatch::build_with(self.game.scene(), self.game.textures(), renderer.is_srgb());
            if let Err(e) = renderer.render(&batch) {
                error!("Render error: {:?}", e);
                if matches!(e, wgpu::SurfaceError::OutOfMemory) {
                    event_loop.exit();
                    return;
                }
            }
        }
        self.window_manager.request_redraw();
    }

    /// Whatever stopped the loop, if it was an error.
    pub fn take_error(&mut self) -> Option<GameError> {
        self.error.take()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(()) => self.window_manager.request_redraw(),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => (),
        }
    }
}

impl ScratchGame {
    /// Runs the game until the window is closed or [`ScratchGame::destroy`] is
    /// called. Returns the first hook or graphics error that stopped it.
    pub fn run(self) -> Result<(), GameError> {
        if self.is_headless() {
            return run_headless(self);
        }

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;
        match app.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn run_headless(mut game: ScratchGame) -> Result<(), GameError> {
    info!("Running headless");
    while !game.is_exit_requested() {
        let started = Instant::now();
        game.step(HEADLESS_FRAME)?;
        if let Some(rest) = HEADLESS_FRAME.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
    Ok(())
}
