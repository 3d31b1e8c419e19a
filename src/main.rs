//! Brick Breaker headless runner
//!
//! Plays the configured levels with an autopilot paddle and logs what happens.
//! Run with `RUST_LOG=info` (or `debug` for every hit).
//!
//! Usage: `brick-breaker [config.json] [levels_dir] [frames] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cmp::Ordering;
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use brick_breaker::consts::PADDLE_KEY_STEP;
    use brick_breaker::platform::{FileStore, InputEvent, Key, KeyValueStore, MenuChoice};
    use brick_breaker::sim::{Phase, RoundEvent};
    use brick_breaker::{Bounds, Controls, Game, GameConfig, HostRequest, Level, LevelError};

    const DEFAULT_CONFIG: &str = "assets/config.json";
    const DEFAULT_LEVELS: &str = "assets/levels";
    const SETTINGS_FILE: &str = "brick-breaker-settings.json";
    const DEFAULT_FRAMES: u64 = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FIELD: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    /// Play the levels headless with an autopilot paddle
    #[derive(Parser, Debug)]
    #[command(name = "brick-breaker", version, about, long_about = None)]
    struct Args {
        /// Game configuration file
        #[arg(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Directory holding the level*.json files
        #[arg(default_value = DEFAULT_LEVELS)]
        levels: PathBuf,

        /// Frames to simulate at 60 Hz
        #[arg(default_value_t = DEFAULT_FRAMES)]
        frames: u64,

        /// RNG seed (defaults to the clock)
        seed: Option<u64>,
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// `level*.json` files in name order
    fn level_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| {
                    let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                    name.starts_with("level") && name.ends_with(".json")
                })
                .collect(),
            Err(e) => {
                log::error!("Cannot read levels from {}: {e}", dir.display());
                Vec::new()
            }
        };
        files.sort();
        files
    }

    fn serve<S: KeyValueStore>(game: &mut Game<S>, request: Option<HostRequest>, levels: &[PathBuf]) {
        match request {
            Some(HostRequest::LoadLevel(load)) => {
                let result = levels
                    .get(load.level)
                    .ok_or(LevelError::UnknownLevel(load.level))
                    .and_then(Level::load);
                if game.complete_load(load.ticket, result) {
                    log::info!(
                        "Level {} attached, {} block(s) to clear",
                        load.level + 1,
                        game.round().breakable_blocks()
                    );
                }
            }
            Some(HostRequest::EditLevel(load)) => {
                let result = levels
                    .get(load.level)
                    .ok_or(LevelError::UnknownLevel(load.level))
                    .and_then(Level::load);
                game.complete_load(load.ticket, result);
            }
            Some(HostRequest::SaveLevel(json)) => {
                let path = "level-edited.json";
                match std::fs::write(path, json) {
                    Ok(()) => log::info!("Saved edited level to {path}"),
                    Err(e) => log::warn!("Could not save edited level: {e}"),
                }
            }
            None => {}
        }
    }

    /// Where the autopilot wants the paddle's center: under the lowest falling
    /// ball, or under the nearest pickup when nothing is falling
    fn autopilot_target<S: KeyValueStore>(game: &Game<S>, frame: u64) -> Option<f32> {
        let round = game.round();
        let falling = round
            .balls
            .iter()
            .filter(|b| b.velocity().y > 0.0)
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal));

        if let Some(ball) = falling {
            // vary the return angle a little
            let aim = ((frame / 90) % 5) as f32 - 2.0;
            return Some(ball.pos.x + aim * round.paddle.width / 8.0);
        }
        round
            .power_ups
            .iter()
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal))
            .map(|p| p.pos.x)
            .or_else(|| round.balls.first().map(|b| b.pos.x))
    }

    fn steer<S: KeyValueStore>(game: &mut Game<S>, target: f32) {
        match game.settings().settings().controls {
            Controls::Mouse => {
                game.handle_input(InputEvent::PointerMoved { x: target });
            }
            Controls::Keyboard => {
                let offset = target - game.round().paddle.center_x();
                if offset.abs() > PADDLE_KEY_STEP / 2.0 {
                    let key = if offset < 0.0 { Key::Left } else { Key::Right };
                    game.handle_input(InputEvent::Key(key));
                }
            }
        }
    }

    pub fn run() -> Result<(), brick_breaker::ConfigError> {
        let args = Args::parse();
        let seed = args.seed.unwrap_or_else(clock_seed);
        let config = GameConfig::load(&args.config)?;
        let levels = level_files(&args.levels);
        if levels.is_empty() {
            log::warn!("No level files in {}", args.levels.display());
        }
        log::info!(
            "Running {} frames over {} level(s), seed {}",
            args.frames,
            levels.len(),
            seed
        );

        let store = FileStore::open(SETTINGS_FILE);
        let mut game = Game::seeded(&config, FIELD, levels.len(), store, seed);

        let request = game.handle_input(InputEvent::Menu(MenuChoice::Play));
        serve(&mut game, request, &levels);

        let mut cleared = 0;
        let mut lost = 0;
        for frame in 0..args.frames {
            match game.phase() {
                Phase::Playing => {
                    if let Some(target) = autopilot_target(&game, frame) {
                        steer(&mut game, target);
                    }
                }
                Phase::Won | Phase::Lost => {
                    let request = game.handle_input(InputEvent::Key(Key::Enter));
                    serve(&mut game, request, &levels);
                }
                Phase::LoadFailed => {
                    log::error!("Giving up after a failed level load");
                    break;
                }
                _ => {}
            }

            for event in game.frame(frame as f64 * FRAME_MS) {
                match event {
                    RoundEvent::LevelCleared { level, next_level } => {
                        cleared += 1;
                        log::info!("Level {} cleared, next is {}", level + 1, next_level + 1);
                    }
                    RoundEvent::GameOver { score, highscore } => {
                        lost += 1;
                        log::info!("Game over at {score} (best {highscore})");
                    }
                    other => log::debug!("{other:?}"),
                }
            }
        }

        let round = game.round();
        log::info!(
            "Done: {cleared} level(s) cleared, {lost} game(s) lost, score {}, highscore {}",
            round.score,
            round.highscore
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `Game` directly; nothing to run here
}
