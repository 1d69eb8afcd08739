//! Demo entry point: a sky background and an animated spritesheet.
//!
//! Usage: `scratch_game [config.toml]`. Assets are read from `assets/` unless
//! the config sets `loader.base_path`.

use std::cell::Cell;
use std::rc::Rc;

use log::{error, info};
use scratch_game::{Color, GameConfig, ObjectId, ScratchGame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Logger initialized");

    let mut config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::new(800, 600),
    };
    if config.loader.base_path.is_none() {
        config.loader.base_path = Some("assets".into());
    }

    let mut game = ScratchGame::with_config(config)?;
    let dude: Rc<Cell<Option<ObjectId>>> = Rc::new(Cell::new(None));

    game.on_preload(|game| {
        game.load_image("sky", "sky.png");
        game.load_spritesheet("dude", "dude.png", 32, 48);
        Ok(())
    });

    let created = dude.clone();
    game.on_create(move |game| {
        game.set_background_color(Color::from_hex(0x87ceeb))?;
        if game.textures().contains("sky") {
            game.change_background("sky")?;
        }
        let (x, y) = (game.width() / 2.0, game.height() / 2.0);
        created.set(Some(game.create_sprite("dude", x, y)?));
        Ok(())
    });

    let mut shown = 0;
    game.on_update(move |game| {
        let Some(id) = dude.get() else {
            return Ok(());
        };
        let frames = game.textures().get("dude").map_or(0, |t| t.frames.len());
        if frames > 0 {
            let frame = (game.time() * 10.0) as usize % frames;
            if frame != shown {
                game.set_sprite_frame(id, frame)?;
                shown = frame;
            }
        }
        Ok(())
    });

    if let Err(e) = game.run() {
        error!("Game stopped: {}", e);
        return Err(Box::new(e));
    }

    Ok(())
}
