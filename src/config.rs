//! Game configuration document
//!
//! One JSON document with `ball`, `paddle`, `block`, `powerUp` and `ui`
//! sections. The simulation reads only the numeric fields; visual fields are
//! carried through untouched for whatever renders the game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::BlockBounce;

/// `{ "x": .., "y": .. }` as written in config and level files
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallConfig {
    pub radius: f32,
    pub start_position: Point,
    /// Units per second
    pub velocity: Point,
    pub mass: f32,
    pub line_width: f32,
    /// Horizontal speed given by a hit on the very edge of the paddle
    pub bounce_multiplier: f32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub start_angle: Option<f32>,
    #[serde(default)]
    pub end_angle: Option<f32>,
}

impl BallConfig {
    /// Radius plus half the stroke
    pub fn effective_size(&self) -> f32 {
        self.radius + self.line_width / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleConfig {
    pub width: f32,
    pub height: f32,
    pub start_position: Point,
    pub line_width: f32,
    /// Width added by each PaddleGrow pickup
    #[serde(default = "default_grow_step")]
    pub grow_step: f32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    pub width: f32,
    pub height: f32,
    pub line_width: f32,
    #[serde(default)]
    pub bounce: BlockBounce,
    #[serde(default)]
    pub stroke_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpConfig {
    pub radius: f32,
    pub velocity: Point,
    pub mass: f32,
    #[serde(default)]
    pub line_width: f32,
    /// Constant fall acceleration; zero means the pickup keeps its initial velocity
    #[serde(default)]
    pub acceleration: Point,
    /// Chance that a flagged block drops a pickup when destroyed
    #[serde(default = "default_spawn_chance")]
    pub spawn_chance: f32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
}

fn default_grow_step() -> f32 {
    20.0
}

fn default_spawn_chance() -> f32 {
    0.2
}

/// The whole configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub ball: BallConfig,
    pub paddle: PaddleConfig,
    pub block: BlockConfig,
    pub power_up: PowerUpConfig,
    /// Button/text styling; opaque to the simulation
    #[serde(default)]
    pub ui: serde_json::Value,
}

impl GameConfig {
    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation divides by or relies on being positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ball.radius", self.ball.radius)?;
        positive("ball.mass", self.ball.mass)?;
        positive("ball.bounceMultiplier", self.ball.bounce_multiplier)?;
        non_negative("ball.lineWidth", self.ball.line_width)?;

        positive("paddle.width", self.paddle.width)?;
        positive("paddle.height", self.paddle.height)?;
        non_negative("paddle.lineWidth", self.paddle.line_width)?;
        non_negative("paddle.growStep", self.paddle.grow_step)?;

        positive("block.width", self.block.width)?;
        positive("block.height", self.block.height)?;
        non_negative("block.lineWidth", self.block.line_width)?;

        positive("powerUp.radius", self.power_up.radius)?;
        positive("powerUp.mass", self.power_up.mass)?;
        non_negative("powerUp.lineWidth", self.power_up.line_width)?;
        if !(0.0..=1.0).contains(&self.power_up.spawn_chance) {
            return Err(ConfigError::Invalid {
                field: "powerUp.spawnChance",
                reason: format!("{} is outside [0, 1]", self.power_up.spawn_chance),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}

#[cfg(test)]
pub(crate) const TEST_CONFIG: &str = r##"{
    "ball": {
        "radius": 10, "startPosition": { "x": 400, "y": 450 },
        "velocity": { "x": 0, "y": -300 }, "mass": 1, "color": "#ffffff",
        "strokeColor": "#000000", "lineWidth": 2, "startAngle": 0,
        "endAngle": 6.283, "bounceMultiplier": 360
    },
    "paddle": {
        "width": 150, "height": 20, "startPosition": { "x": 325, "y": 540 },
        "color": "#f8d928", "strokeColor": "#000000", "lineWidth": 2
    },
    "block": { "width": 80, "height": 30, "strokeColor": "#000000", "lineWidth": 2 },
    "powerUp": {
        "radius": 12, "velocity": { "x": 0, "y": 120 }, "mass": 1,
        "color": "#ffffff", "strokeColor": "#000000"
    },
    "ui": { "button": { "width": 200, "height": 60 } }
}"##;

#[cfg(test)]
pub(crate) fn test_config() -> GameConfig {
    GameConfig::from_json(TEST_CONFIG).expect("test config parses")
}
