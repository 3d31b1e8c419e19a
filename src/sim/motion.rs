//! Euler integrator shared by every moving entity
//!
//! Entities embed a `Motion` and move their own position; this only owns the
//! velocity side of the integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Always > 0
    pub mass: f32,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Motion {
    pub fn new(mass: f32, velocity: Vec2) -> Self {
        debug_assert!(mass > 0.0, "mass must be positive, got {mass}");
        Self {
            mass,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    /// Motion under a constant acceleration
    pub fn with_acceleration(mass: f32, velocity: Vec2, acceleration: Vec2) -> Self {
        Self {
            acceleration,
            ..Self::new(mass, velocity)
        }
    }

    /// Accumulate a force for the next integration (F = m * a)
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
    }

    /// Drop accumulated acceleration (for bodies whose forces last one frame)
    pub fn clear_acceleration(&mut self) {
        self.acceleration = Vec2::ZERO;
    }

    /// velocity += acceleration * dt
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "negative delta time {dt}");
        self.velocity += self.acceleration * dt;
    }

    /// Displacement for this frame, using the already-integrated velocity
    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec2 {
        self.velocity * dt
    }
}
