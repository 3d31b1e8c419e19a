//! Falling pickups dropped by destroyed blocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::paddle_catches;
use super::motion::Motion;
use super::paddle::Paddle;
use crate::config::PowerUpConfig;
use crate::consts::{PULSE_MAX, PULSE_MIN, PULSE_RATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Adds a ball above the paddle
    ExtraBall,
    /// Widens the paddle by the configured step
    PaddleGrow,
}

impl PowerUpKind {
    /// Uniform choice from a roll in [0, 1)
    pub fn pick(roll: f32) -> Self {
        if roll < 0.5 {
            PowerUpKind::ExtraBall
        } else {
            PowerUpKind::PaddleGrow
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub line_width: f32,
    pub motion: Motion,
    /// Glow intensity for rendering, oscillates in [PULSE_MIN, PULSE_MAX]
    pub pulse: f32,
    pulse_dir: f32,
}

impl PowerUp {
    /// A pickup of `kind` centered on `pos`, moving as configured
    pub fn spawn(kind: PowerUpKind, pos: Vec2, config: &PowerUpConfig) -> Self {
        Self {
            kind,
            pos,
            radius: config.radius,
            line_width: config.line_width,
            motion: Motion::with_acceleration(
                config.mass,
                config.velocity.into(),
                config.acceleration.into(),
            ),
            pulse: PULSE_MAX,
            pulse_dir: -1.0,
        }
    }

    #[inline]
    pub fn effective_size(&self) -> f32 {
        self.radius + self.line_width / 2.0
    }

    /// Integrate (acceleration persists between frames) and advance the pulse
    pub fn update(&mut self, dt: f32) {
        self.motion.integrate(dt);
        self.pos += self.motion.displacement(dt);

        self.pulse += PULSE_RATE * dt * self.pulse_dir;
        if self.pulse >= PULSE_MAX {
            self.pulse = PULSE_MAX;
            self.pulse_dir = -1.0;
        } else if self.pulse <= PULSE_MIN {
            self.pulse = PULSE_MIN;
            self.pulse_dir = 1.0;
        }
    }

    /// Same band the ball uses against the paddle
    pub fn check_capture(&self, paddle: &Paddle) -> bool {
        paddle_catches(self.pos, self.effective_size(), self.motion.velocity.y, paddle)
    }

    pub fn is_below(&self, height: f32) -> bool {
        self.pos.y > height
    }
}
