//! Collision tests for the rectangular playfield
//!
//! Everything here is axis-aligned. Circles are tested through their bounding
//! boxes, so a ball grazing the corner of a block or paddle can register a hit
//! it would not get with an exact circle-rectangle distance test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::paddle::Paddle;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box spanning a rectangle given by its top-left corner and size
    pub fn from_rect(top_left: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: top_left,
            max: top_left + Vec2::new(width, height),
        }
    }

    /// Box enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Grow by `margin` on every side
    pub fn inflate(self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Strict overlap; boxes that only touch do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Whether a descending circle is caught by the paddle.
///
/// The circle's center must lie over the paddle span and its bottom edge must
/// be inside the band from the paddle top down to one extra paddle height
/// below the paddle, so grazing hits on the paddle edge still count.
pub fn paddle_catches(position: Vec2, effective_size: f32, velocity_y: f32, paddle: &Paddle) -> bool {
    if velocity_y <= 0.0 {
        return false;
    }

    let left = paddle.pos.x;
    let right = paddle.pos.x + paddle.width;
    if position.x < left || position.x > right {
        return false;
    }

    let bottom = position.y + effective_size;
    let band_top = paddle.pos.y;
    let band_bottom = paddle.pos.y + paddle.height + paddle.height;
    bottom >= band_top && bottom <= band_bottom
}

/// Where on the paddle a point lies: -1 at the left edge, 0 at the center, +1 at the right edge
#[inline]
pub fn paddle_offset(x: f32, paddle: &Paddle) -> f32 {
    let half = paddle.width / 2.0;
    let center = paddle.pos.x + half;
    ((x - center) / half).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle() -> Paddle {
        Paddle::new(Vec2::new(100.0, 500.0), 150.0, 20.0, 2.0)
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_rect(Vec2::ZERO, 10.0, 10.0);
        let touching = Aabb::from_rect(Vec2::new(10.0, 0.0), 10.0, 10.0);
        let crossing = Aabb::from_rect(Vec2::new(9.5, 9.5), 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn test_inflate_and_circle_box() {
        let circle = Aabb::around_circle(Vec2::new(5.0, 5.0), 2.0);
        assert_eq!(circle.min, Vec2::new(3.0, 3.0));
        assert_eq!(circle.max, Vec2::new(7.0, 7.0));
        let grown = circle.inflate(1.0);
        assert_eq!(grown.min, Vec2::new(2.0, 2.0));
        assert_eq!(grown.max, Vec2::new(8.0, 8.0));
    }

    #[test]
    fn test_paddle_band() {
        let paddle = paddle();
        // bottom edge at 506: inside band [500, 540]
        assert!(paddle_catches(Vec2::new(175.0, 495.0), 11.0, 2.0, &paddle));
        // rising balls are never caught
        assert!(!paddle_catches(Vec2::new(175.0, 495.0), 11.0, -2.0, &paddle));
        // bottom edge at 541: below the edge band
        assert!(!paddle_catches(Vec2::new(175.0, 530.0), 11.0, 2.0, &paddle));
        // bottom edge at 488: above the paddle
        assert!(!paddle_catches(Vec2::new(175.0, 477.0), 11.0, 2.0, &paddle));
        // outside the horizontal span
        assert!(!paddle_catches(Vec2::new(99.0, 495.0), 11.0, 2.0, &paddle));
        assert!(paddle_catches(Vec2::new(250.0, 495.0), 11.0, 2.0, &paddle));
    }

    #[test]
    fn test_paddle_offset() {
        let paddle = paddle();
        assert_eq!(paddle_offset(175.0, &paddle), 0.0);
        assert_eq!(paddle_offset(100.0, &paddle), -1.0);
        assert_eq!(paddle_offset(250.0, &paddle), 1.0);
        assert_eq!(paddle_offset(137.5, &paddle), -0.5);
    }
}
