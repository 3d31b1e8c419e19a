//! Brick Breaker - physics and round core for a brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Simulation (motion, collisions, power-ups, round state machine)
//! - `config`: Game configuration document
//! - `level`: Level file format
//! - `editor`: Grid-snapped level editor model
//! - `settings`: Persisted player preferences
//! - `platform`: Host abstraction (frame timing, input routing, storage)
//! - `game`: Host-facing façade tying the above together

pub mod config;
pub mod editor;
pub mod error;
pub mod game;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, LevelError};
pub use game::{Game, HostRequest};
pub use level::Level;
pub use settings::{Controls, Difficulty, Settings, SettingsStore};

/// Game configuration constants
pub mod consts {
    /// Largest delta time accepted from one frame callback (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Paddle step per arrow-key press
    pub const PADDLE_KEY_STEP: f32 = 15.0;
    /// Paddle never shrinks below this, whatever the difficulty
    pub const MIN_PADDLE_WIDTH: f32 = 20.0;

    /// Score per hit point removed from a breakable block
    pub const BLOCK_SCORE: u64 = 100;
    /// Highest hit points a level file may give a block
    pub const MAX_BLOCK_HP: u8 = 5;

    /// Power-up pulse bounds and speed (cosmetic)
    pub const PULSE_MIN: f32 = 0.5;
    pub const PULSE_MAX: f32 = 1.0;
    pub const PULSE_RATE: f32 = 1.5;

    /// Gap left between the paddle and a ball spawned by a pickup
    pub const SPAWN_CLEARANCE: f32 = 1.0;
}

/// Playfield extents. Origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
