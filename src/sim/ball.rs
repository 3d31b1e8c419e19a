//! Ball entity and its wall, paddle and block bounce rules

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockBounce;
use super::collision::{paddle_catches, paddle_offset};
use super::motion::Motion;
use super::paddle::Paddle;
use crate::Bounds;
use crate::config::BallConfig;
use crate::consts::SPAWN_CLEARANCE;

/// What happens at the bottom edge of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Floor {
    /// Ball falls through and is lost (normal play)
    #[default]
    Open,
    /// Ball reflects like the other walls (practice / attract mode)
    Solid,
}

/// Which surfaces the ball bounced off during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub wall: bool,
    pub paddle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    pub line_width: f32,
    /// Horizontal speed after hitting the paddle edge
    pub bounce_multiplier: f32,
    pub motion: Motion,
    #[serde(default)]
    pub floor: Floor,
    spawn: Vec2,
}

impl Ball {
    pub fn new(
        pos: Vec2,
        radius: f32,
        line_width: f32,
        velocity: Vec2,
        mass: f32,
        bounce_multiplier: f32,
    ) -> Self {
        Self {
            pos,
            radius,
            line_width,
            bounce_multiplier,
            motion: Motion::new(mass, velocity),
            floor: Floor::Open,
            spawn: pos,
        }
    }

    /// The level's default ball at its configured start point
    pub fn from_config(config: &BallConfig) -> Self {
        Self::new(
            config.start_position.into(),
            config.radius,
            config.line_width,
            config.velocity.into(),
            config.mass,
            config.bounce_multiplier,
        )
    }

    /// A default ball resting just above the paddle center, heading up
    pub fn above_paddle(config: &BallConfig, paddle: &Paddle) -> Self {
        let pos = Vec2::new(
            paddle.center_x(),
            paddle.pos.y - config.effective_size() - SPAWN_CLEARANCE,
        );
        let velocity = Vec2::new(config.velocity.x, -config.velocity.y.abs());
        Self::new(
            pos,
            config.radius,
            config.line_width,
            velocity,
            config.mass,
            config.bounce_multiplier,
        )
    }

    pub fn with_floor(mut self, floor: Floor) -> Self {
        self.floor = floor;
        self
    }

    /// Radius plus half the stroke; the size used for every boundary test
    #[inline]
    pub fn effective_size(&self) -> f32 {
        self.radius + self.line_width / 2.0
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.motion.velocity
    }

    /// Walls, then paddle, then integrate, then move
    pub fn update(&mut self, dt: f32, bounds: Bounds, paddle: &Paddle) -> Contact {
        let wall = self.resolve_walls(bounds);
        let paddle = self.resolve_paddle(paddle);

        self.motion.integrate(dt);
        self.motion.clear_acceleration();
        self.pos += self.motion.displacement(dt);

        Contact { wall, paddle }
    }

    /// Clamp against the walls and reflect. The bottom only reflects with a solid floor.
    pub fn resolve_walls(&mut self, bounds: Bounds) -> bool {
        let s = self.effective_size();
        let vel = &mut self.motion.velocity;
        let mut hit = false;

        if self.floor == Floor::Solid && self.pos.y + s >= bounds.height {
            self.pos.y = bounds.height - s;
            vel.y = -vel.y;
            hit = true;
        } else if self.pos.y - s <= 0.0 {
            self.pos.y = s;
            vel.y = -vel.y;
            hit = true;
        }

        if self.pos.x + s >= bounds.width {
            self.pos.x = bounds.width - s;
            vel.x = -vel.x;
            hit = true;
        } else if self.pos.x - s <= 0.0 {
            self.pos.x = s;
            vel.x = -vel.x;
            hit = true;
        }

        hit
    }

    /// Bounce off the paddle if it catches the ball. Horizontal speed is set
    /// from where the ball landed, which is how the player aims.
    pub fn resolve_paddle(&mut self, paddle: &Paddle) -> bool {
        let s = self.effective_size();
        if !paddle_catches(self.pos, s, self.motion.velocity.y, paddle) {
            return false;
        }

        let offset = paddle_offset(self.pos.x, paddle);
        self.motion.velocity.x = offset * self.bounce_multiplier;
        self.motion.velocity.y = -self.motion.velocity.y;
        true
    }

    pub fn bounce_off_block(&mut self, mode: BlockBounce) {
        self.motion.velocity.y = -self.motion.velocity.y;
        if mode == BlockBounce::Both {
            self.motion.velocity.x = -self.motion.velocity.x;
        }
    }

    /// Back to the spawn point; velocity is left alone
    pub fn reset_position(&mut self) {
        self.pos = self.spawn;
    }

    /// Entirely below the bottom edge
    pub fn is_below(&self, height: f32) -> bool {
        self.pos.y - self.effective_size() > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn ball_at(x: f32, y: f32, vel: Vec2) -> Ball {
        Ball::new(Vec2::new(x, y), 10.0, 2.0, vel, 1.0, 8.0)
    }

    fn paddle() -> Paddle {
        Paddle::new(Vec2::new(100.0, 500.0), 150.0, 20.0, 2.0)
    }

    #[test]
    fn test_top_wall_clamps_and_flips() {
        let mut ball = ball_at(400.0, 5.0, Vec2::new(1.0, -3.0));
        assert!(ball.resolve_walls(BOUNDS));
        assert_eq!(ball.pos.y, 11.0);
        assert_eq!(ball.velocity().y, 3.0);
    }

    #[test]
    fn test_side_walls() {
        let mut ball = ball_at(795.0, 300.0, Vec2::new(4.0, 1.0));
        ball.resolve_walls(BOUNDS);
        assert_eq!(ball.pos.x, 789.0);
        assert_eq!(ball.velocity().x, -4.0);

        let mut ball = ball_at(3.0, 300.0, Vec2::new(-4.0, 1.0));
        ball.resolve_walls(BOUNDS);
        assert_eq!(ball.pos.x, 11.0);
        assert_eq!(ball.velocity().x, 4.0);
    }

    #[test]
    fn test_open_floor_does_not_reflect() {
        let mut ball = ball_at(400.0, 605.0, Vec2::new(0.0, 3.0));
        assert!(!ball.resolve_walls(BOUNDS));
        assert_eq!(ball.pos.y, 605.0);
        assert_eq!(ball.velocity().y, 3.0);
    }

    #[test]
    fn test_solid_floor_reflects() {
        // height 600, s = 11: ball at 605 moving down ends at 589 moving up
        let mut ball = ball_at(400.0, 605.0, Vec2::new(0.0, 3.0)).with_floor(Floor::Solid);
        let contact = ball.update(0.0, BOUNDS, &paddle());
        assert!(contact.wall);
        assert_eq!(ball.pos.y, 589.0);
        assert_eq!(ball.velocity().y, -3.0);
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let mut ball = ball_at(175.0, 495.0, Vec2::new(5.0, 2.0));
        let contact = ball.update(0.0, BOUNDS, &paddle());
        assert!(contact.paddle);
        assert_eq!(ball.velocity(), Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_paddle_edges_give_full_deflection() {
        let mut left = ball_at(100.0, 495.0, Vec2::new(0.0, 2.0));
        assert!(left.resolve_paddle(&paddle()));
        assert_eq!(left.velocity(), Vec2::new(-8.0, -2.0));

        let mut right = ball_at(250.0, 495.0, Vec2::new(0.0, 2.0));
        assert!(right.resolve_paddle(&paddle()));
        assert_eq!(right.velocity(), Vec2::new(8.0, -2.0));
    }

    #[test]
    fn test_rising_ball_passes_paddle() {
        let mut ball = ball_at(175.0, 495.0, Vec2::new(0.0, -2.0));
        assert!(!ball.resolve_paddle(&paddle()));
        assert_eq!(ball.velocity(), Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_update_moves_by_velocity_times_dt() {
        let mut ball = ball_at(400.0, 300.0, Vec2::new(100.0, -50.0));
        ball.motion.apply_force(Vec2::new(0.0, 20.0));
        ball.update(0.5, BOUNDS, &paddle());
        // velocity integrated first (-50 + 20 * 0.5 = -40), then position
        assert_eq!(ball.velocity(), Vec2::new(100.0, -40.0));
        assert_eq!(ball.pos, Vec2::new(450.0, 280.0));
        // forces last one frame
        assert_eq!(ball.motion.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_block_bounce_modes() {
        let mut ball = ball_at(400.0, 300.0, Vec2::new(3.0, -4.0));
        ball.bounce_off_block(BlockBounce::Vertical);
        assert_eq!(ball.velocity(), Vec2::new(3.0, 4.0));
        ball.bounce_off_block(BlockBounce::Both);
        assert_eq!(ball.velocity(), Vec2::new(-3.0, -4.0));
    }

    #[test]
    fn test_reset_position_keeps_velocity() {
        let mut ball = ball_at(400.0, 300.0, Vec2::new(3.0, -4.0));
        ball.pos = Vec2::new(10.0, 10.0);
        ball.reset_position();
        assert_eq!(ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ball.velocity(), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_is_below() {
        assert!(!ball_at(400.0, 611.0, Vec2::ZERO).is_below(600.0));
        assert!(ball_at(400.0, 611.5, Vec2::ZERO).is_below(600.0));
    }

    proptest! {
        #[test]
        fn prop_top_wall(y in -50.0f32..11.0, vy in -500.0f32..500.0) {
            let mut ball = ball_at(400.0, y, Vec2::new(0.0, vy));
            ball.resolve_walls(BOUNDS);
            prop_assert_eq!(ball.pos.y, 11.0);
            prop_assert_eq!(ball.velocity().y, -vy);
        }

        #[test]
        fn prop_paddle_hit_always_sends_ball_up(
            x in 100.0f32..=250.0,
            y in 489.0f32..=529.0,
            vy in 0.01f32..500.0,
        ) {
            let mut ball = ball_at(x, y, Vec2::new(0.0, vy));
            prop_assert!(ball.resolve_paddle(&paddle()));
            prop_assert!(ball.velocity().y < 0.0);
            prop_assert!(ball.velocity().x.abs() <= ball.bounce_multiplier);
        }
    }
}
