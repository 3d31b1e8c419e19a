//! The player's paddle: a rectangle that only moves horizontally

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::PaddleConfig;
use crate::consts::PADDLE_KEY_STEP;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub line_width: f32,
    /// Width restored by `reset_width` (difficulty-scaled)
    pub base_width: f32,
    start_pos: Vec2,
}

impl Paddle {
    pub fn new(pos: Vec2, width: f32, height: f32, line_width: f32) -> Self {
        Self {
            pos,
            width,
            height,
            line_width,
            base_width: width,
            start_pos: pos,
        }
    }

    pub fn from_config(config: &PaddleConfig) -> Self {
        Self::new(
            config.start_position.into(),
            config.width,
            config.height,
            config.line_width,
        )
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Center the paddle on the pointer, pinned against either wall
    pub fn clamp_to_mouse(&mut self, target_x: f32, bounds_width: f32) {
        let half = self.width / 2.0;
        if target_x + half + self.line_width >= bounds_width {
            self.pos.x = bounds_width - self.width - self.line_width;
        } else if target_x - half - self.line_width <= 0.0 {
            self.pos.x = self.line_width;
        } else {
            self.pos.x = target_x - half;
        }
    }

    /// Move by `delta` and keep the paddle inside the playfield
    pub fn clamp_to_key(&mut self, delta: f32, bounds_width: f32) {
        self.pos.x += delta;
        self.keep_within(bounds_width);
    }

    /// One arrow-key step left (`-1`) or right (`+1`)
    pub fn nudge(&mut self, direction: f32, bounds_width: f32) {
        self.clamp_to_key(direction.signum() * PADDLE_KEY_STEP, bounds_width);
    }

    pub fn keep_within(&mut self, bounds_width: f32) {
        let max_x = (bounds_width - self.width - self.line_width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    pub fn resize(&mut self, delta: f32) {
        self.width += delta;
    }

    pub fn reset_width(&mut self) {
        self.width = self.base_width;
    }

    /// Set the width `reset_width` returns to
    pub fn set_base_width(&mut self, width: f32) {
        self.base_width = width;
    }

    /// Center horizontally and return to the starting height
    pub fn reset_position(&mut self, bounds_width: f32) {
        self.pos.x = (bounds_width - self.width) / 2.0;
        self.pos.y = self.start_pos.y;
    }
}
