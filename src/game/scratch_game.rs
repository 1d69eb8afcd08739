//! `ScratchGame`: a small wrapper that forwards the engine's preload, create
//! and update stages to user hooks and exposes a few shortcuts for loading
//! textures, swapping the background and placing sprites.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use log::{debug, info, warn};

use crate::engine::assets::{Frame, Loader, SpritesheetConfig, TextureCache};
use crate::engine::color::Color;
use crate::engine::config::{GameConfig, RendererKind};
use crate::engine::error::GameError;
use crate::engine::scene::{GameObject, ObjectId, ObjectKind, Scene};
use crate::game::state::GameState;

/// User hook run at one of the lifecycle stages.
pub type Hook = Box<dyn FnMut(&mut ScratchGame) -> anyhow::Result<()>>;

/// Backgrounds sit beneath everything else in the display list.
pub const BACKGROUND_DEPTH: f32 = f32::MIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing has run yet.
    Boot,
    /// Preload hook ran; waiting for the loader to drain.
    Loading,
    /// Inside the create hook.
    Creating,
    Running,
}

pub struct ScratchGame {
    config: GameConfig,
    phase: Phase,
    loader: Loader,
    textures: TextureCache,
    scene: Scene,
    state: GameState,
    background: Option<ObjectId>,
    exit_requested: bool,
    preload: Option<Hook>,
    create: Option<Hook>,
    update: Option<Hook>,
}

impl ScratchGame {
    /// A game with the fixed configuration: `width` x `height` canvas, automatic
    /// renderer, arcade physics with debug drawing off.
    pub fn new(width: u32, height: u32) -> Result<Self, GameError> {
        Self::with_config(GameConfig::new(width, height))
    }

    pub fn with_config(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        info!(
            "Creating {}x{} game, renderer {:?}, physics {:?} (debug: {})",
            config.width,
            config.height,
            config.renderer,
            config.physics.default,
            config.physics.arcade.debug
        );
        Ok(Self {
            loader: Loader::new(config.loader.base_path.clone()),
            textures: TextureCache::new(),
            scene: Scene::new(config.width, config.height),
            state: GameState::new(),
            phase: Phase::Boot,
            background: None,
            exit_requested: false,
            preload: None,
            create: None,
            update: None,
            config,
        })
    }

    pub fn on_preload(&mut self, hook: impl FnMut(&mut ScratchGame) -> anyhow::Result<()> + 'static) {
        self.preload = Some(Box::new(hook));
    }

    pub fn on_create(&mut self, hook: impl FnMut(&mut ScratchGame) -> anyhow::Result<()> + 'static) {
        self.create = Some(Box::new(hook));
    }

    pub fn on_update(&mut self, hook: impl FnMut(&mut ScratchGame) -> anyhow::Result<()> + 'static) {
        self.update = Some(Box::new(hook));
    }

    pub fn load_image(&mut self, key: &str, url: &str) -> bool {
        if self.key_in_use(key) {
            return false;
        }
        self.loader.image(key, url)
    }

    pub fn load_spritesheet(&mut self, key: &str, url: &str, frame_width: u32, frame_height: u32) -> bool {
        self.load_spritesheet_with(key, url, SpritesheetConfig::new(frame_width, frame_height))
    }

    pub fn load_spritesheet_with(&mut self, key: &str, url: &str, config: SpritesheetConfig) -> bool {
        if self.key_in_use(key) {
            return false;
        }
        self.loader.spritesheet(key, url, config)
    }

    fn key_in_use(&self, key: &str) -> bool {
        if self.textures.contains(key) {
            warn!("[loader] Texture key `{}` already in use, ignoring", key);
            return true;
        }
        false
    }

    /// Replaces the background with the image `key`, centred on the canvas.
    pub fn change_background(&mut self, key: &str) -> Result<ObjectId, GameError> {
        self.require_scene("change_background")?;
        let center = self.scene.scale().center();
        let texture = self.textures.resolve(key);
        let frame = texture.default_frame();
        let size = frame_size(texture.frame(frame));
        let image = GameObject::image(texture.key.clone(), frame, center, size).with_depth(BACKGROUND_DEPTH);

        self.clear_background();
        let id = self.scene.add(image);
        self.background = Some(id);
        Ok(id)
    }

    /// Replaces the background with a rectangle of `color` covering the canvas.
    pub fn set_background_color(&mut self, color: impl Into<Color>) -> Result<ObjectId, GameError> {
        self.require_scene("set_background_color")?;
        let size = self.scene.scale().size();
        let rectangle = GameObject::rectangle(Vec2::ZERO, size, color.into())
            .with_origin(Vec2::ZERO)
            .with_depth(BACKGROUND_DEPTH);

        self.clear_background();
        let id = self.scene.add(rectangle);
        self.background = Some(id);
        Ok(id)
    }

    // At most one background is alive: the old one goes before a new one is assigned.
    fn clear_background(&mut self) {
        if let Some(old) = self.background.take() {
            self.scene.destroy(old);
        }
    }

    /// The live background, if any. A background destroyed through
    /// [`ScratchGame::scene_mut`] no longer counts.
    pub fn background(&self) -> Option<ObjectId> {
        self.background.filter(|id| self.scene.contains(*id))
    }

    pub fn create_sprite(&mut self, key: &str, x: f32, y: f32) -> Result<ObjectId, GameError> {
        self.require_scene("create_sprite")?;
        let texture = self.textures.resolve(key);
        let frame = texture.default_frame();
        let size = frame_size(texture.frame(frame));
        let sprite = GameObject::sprite(texture.key.clone(), frame, Vec2::new(x, y), size);
        Ok(self.scene.add(sprite))
    }

    /// Shows another frame of a sprite's spritesheet.
    pub fn set_sprite_frame(&mut self, id: ObjectId, frame: usize) -> Result<(), GameError> {
        self.require_scene("set_sprite_frame")?;
        let object = self.scene.get_mut(id).ok_or(GameError::UnknownObject(id))?;
        let ObjectKind::Sprite { texture, frame: current } = &mut object.kind else {
            return Err(GameError::NotASprite(id));
        };
        let rect = self
            .textures
            .get(texture)
            .and_then(|t| t.frame(Some(frame)))
            .ok_or_else(|| GameError::UnknownFrame {
                key: texture.clone(),
                frame,
            })?;
        *current = Some(frame);
        object.size = Vec2::new(rect.width as f32, rect.height as f32);
        Ok(())
    }

    fn require_scene(&self, operation: &'static str) -> Result<(), GameError> {
        if self.phase < Phase::Creating {
            return Err(GameError::SceneNotCreated(operation));
        }
        Ok(())
    }

    /// Advances the lifecycle by one frame: preload and start loading on the
    /// first call, run create once the loader is idle, then update every frame.
    pub fn step(&mut self, delta: Duration) -> Result<(), GameError> {
        if self.phase == Phase::Boot {
            debug!("Running preload");
            self.run_hook(Stage::Preload)?;
            self.loader.start();
            self.phase = Phase::Loading;
        }

        if self.phase == Phase::Loading {
            self.loader.poll(&mut self.textures);
            if !self.loader.is_idle() {
                return Ok(());
            }
            info!("Loading complete, {} file(s) failed", self.loader.failures().len());
            self.phase = Phase::Creating;
            debug!("Running create");
            self.run_hook(Stage::Create)?;
            self.phase = Phase::Running;
            return Ok(());
        }

        // files requested after preload load in the background
        if self.loader.has_queued() {
            self.loader.start();
        }
        self.loader.poll(&mut self.textures);
        self.state.advance(delta);
        if let Some(fps) = self.state.update_fps_display() {
            info!("FPS: {}", fps);
        }
        self.run_hook(Stage::Update)
    }

    fn run_hook(&mut self, stage: Stage) -> Result<(), GameError> {
        let Some(mut hook) = self.hook_slot(stage).take() else {
            return Ok(());
        };
        let result = hook(self);
        // the hook may have installed a replacement for itself
        let slot = self.hook_slot(stage);
        if slot.is_none() {
            *slot = Some(hook);
        }
        result.map_err(|source| GameError::Hook {
            stage: stage.name(),
            source,
        })
    }

    fn hook_slot(&mut self, stage: Stage) -> &mut Option<Hook> {
        match stage {
            Stage::Preload => &mut self.preload,
            Stage::Create => &mut self.create,
            Stage::Update => &mut self.update,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn width(&self) -> f32 {
        self.scene.scale().width
    }

    pub fn height(&self) -> f32 {
        self.scene.scale().height
    }

    /// Seconds since the create stage finished.
    pub fn time(&self) -> f32 {
        self.state.time()
    }

    /// Seconds the last frame took.
    pub fn delta(&self) -> f32 {
        self.state.delta()
    }

    pub fn frame(&self) -> u64 {
        self.state.frame()
    }

    /// Asks the game loop to stop after the current frame.
    pub fn destroy(&mut self) {
        info!("Game destroy requested");
        self.exit_requested = true;
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn is_headless(&self) -> bool {
        self.config.renderer == RendererKind::Headless
    }

    /// Reads a TOML config and builds a game from it.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        Self::with_config(GameConfig::load(path)?)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Preload,
    Create,
    Update,
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Preload => "preload",
            Stage::Create => "create",
            Stage::Update => "update",
        }
    }
}

fn frame_size(frame: Option<Frame>) -> Vec2 {
    frame.map_or(Vec2::ZERO, |f| Vec2::new(f.width as f32, f.height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    fn created_game() -> ScratchGame {
        let mut game = ScratchGame::new(800, 600).unwrap();
        game.step(FRAME).unwrap();
        assert_eq!(game.phase(), Phase::Running);
        game
    }

    #[test]
    fn rejects_empty_canvas() {
        assert!(matches!(ScratchGame::new(0, 600), Err(GameError::Config(_))));
    }

    #[test]
    fn scene_operations_need_the_create_stage() {
        let mut game = ScratchGame::new(800, 600).unwrap();
        assert!(matches!(
            game.change_background("sky"),
            Err(GameError::SceneNotCreated("change_background"))
        ));
        assert!(matches!(
            game.set_background_color(Color::BLACK),
            Err(GameError::SceneNotCreated(_))
        ));
        assert!(matches!(
            game.create_sprite("dude", 0.0, 0.0),
            Err(GameError::SceneNotCreated(_))
        ));
        assert!(game.scene().is_empty());
    }

    #[test]
    fn at_most_one_background_is_alive() {
        let mut game = created_game();
        let sprite = game.create_sprite("dude", 10.0, 10.0).unwrap();

        let first = game.set_background_color(Color::from_hex(0x112233)).unwrap();
        let second = game.change_background("sky").unwrap();
        assert!(!game.scene().contains(first));
        let third = game.set_background_color(Color::from_hex(0x445566)).unwrap();
        assert!(!game.scene().contains(second));

        assert_eq!(game.background(), Some(third));
        assert_eq!(game.scene().len(), 2);
        assert!(game.scene().contains(sprite));
    }

    #[test]
    fn background_destroyed_directly_is_forgotten() {
        let mut game = created_game();
        let bg = game.set_background_color(Color::BLACK).unwrap();
        game.scene_mut().destroy(bg);
        assert_eq!(game.background(), None);

        let next = game.change_background("sky").unwrap();
        assert_eq!(game.background(), Some(next));
        assert_eq!(game.scene().len(), 1);
    }

    #[test]
    fn background_color_covers_the_canvas() {
        let mut game = created_game();
        let id = game.set_background_color(Color::from_hex(0xff8800)).unwrap();
        let rect = game.scene().get(id).unwrap();
        assert_eq!(rect.top_left(), Vec2::ZERO);
        assert_eq!(rect.size, Vec2::new(800.0, 600.0));
        assert_eq!(rect.kind, ObjectKind::Rectangle { fill: Color::from_hex(0xff8800) });
    }

    #[test]
    fn background_image_is_centred_and_drawn_first() {
        let mut game = created_game();
        game.create_sprite("dude", 1.0, 1.0).unwrap();
        let id = game.change_background("unknown").unwrap();

        let image = game.scene().get(id).unwrap();
        assert_eq!(image.position, Vec2::new(400.0, 300.0));
        // unknown keys fall back to the placeholder texture
        assert_eq!(image.texture_key(), Some(crate::engine::assets::MISSING_TEXTURE));
        assert_eq!(game.scene().display_list()[0].depth, BACKGROUND_DEPTH);
    }

    #[test]
    fn hooks_run_in_lifecycle_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = ScratchGame::new(100, 100).unwrap();
        let l = log.clone();
        game.on_preload(move |_| {
            l.borrow_mut().push("preload");
            Ok(())
        });
        let l = log.clone();
        game.on_create(move |_| {
            l.borrow_mut().push("create");
            Ok(())
        });
        let l = log.clone();
        game.on_update(move |_| {
            l.borrow_mut().push("update");
            Ok(())
        });

        for _ in 0..3 {
            game.step(FRAME).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["preload", "create", "update", "update"]);
        assert_eq!(game.frame(), 2);
    }

    #[test]
    fn missing_hooks_are_skipped() {
        let mut game = ScratchGame::new(100, 100).unwrap();
        for _ in 0..5 {
            game.step(FRAME).unwrap();
        }
        assert_eq!(game.phase(), Phase::Running);
        assert!((game.time() - 0.064).abs() < 1e-6);
    }

    #[test]
    fn hook_may_replace_itself() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut game = created_game();
        let c = calls.clone();
        game.on_update(move |game| {
            c.borrow_mut().push(1);
            let c = c.clone();
            game.on_update(move |_| {
                c.borrow_mut().push(2);
                Ok(())
            });
            Ok(())
        });
        game.step(FRAME).unwrap();
        game.step(FRAME).unwrap();
        game.step(FRAME).unwrap();
        assert_eq!(*calls.borrow(), vec![1, 2, 2]);
    }

    #[test]
    fn hook_errors_name_their_stage() {
        let mut game = ScratchGame::new(100, 100).unwrap();
        game.on_create(|_| anyhow::bail!("boom"));
        let err = game.step(FRAME).unwrap_err();
        assert!(matches!(err, GameError::Hook { stage: "create", .. }));
        assert_eq!(err.to_string(), "create hook failed: boom");
    }

    #[test]
    fn set_sprite_frame_validates_target() {
        let mut game = created_game();
        let rect = game.set_background_color(Color::BLACK).unwrap();
        assert!(matches!(game.set_sprite_frame(rect, 0), Err(GameError::NotASprite(_))));

        let sprite = game.create_sprite("nothing", 0.0, 0.0).unwrap();
        assert!(matches!(
            game.set_sprite_frame(sprite, 3),
            Err(GameError::UnknownFrame { frame: 3, .. })
        ));

        game.scene_mut().destroy(sprite);
        assert!(matches!(game.set_sprite_frame(sprite, 0), Err(GameError::UnknownObject(_))));
    }

    #[test]
    fn destroy_requests_exit() {
        let mut game = created_game();
        assert!(!game.is_exit_requested());
        game.destroy();
        assert!(game.is_exit_requested());
    }
}
