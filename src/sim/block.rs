//! Destructible (and indestructible) blocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::Aabb;
use super::power_up::PowerUpKind;
use super::rng::RandomSource;
use crate::consts::MAX_BLOCK_HP;

/// How a block hit changes the ball's horizontal velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockBounce {
    /// Only the vertical component flips
    #[default]
    Vertical,
    /// Both components flip
    Both,
}

/// Remaining hit points. Written as `1..=5` or `"Unbreakable"` in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHp", into = "RawHp")]
pub enum BlockHp {
    Hits(u8),
    Unbreakable,
}

impl BlockHp {
    pub const UNBREAKABLE_TAG: &'static str = "Unbreakable";
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawHp {
    Count(u8),
    Tag(String),
}

impl TryFrom<RawHp> for BlockHp {
    type Error = String;

    fn try_from(raw: RawHp) -> Result<Self, Self::Error> {
        match raw {
            RawHp::Count(n) if (1..=MAX_BLOCK_HP).contains(&n) => Ok(BlockHp::Hits(n)),
            RawHp::Count(n) => Err(format!("hp {n} is outside 1..={MAX_BLOCK_HP}")),
            RawHp::Tag(tag) if tag == BlockHp::UNBREAKABLE_TAG => Ok(BlockHp::Unbreakable),
            RawHp::Tag(tag) => Err(format!("unknown hp tag {tag:?}")),
        }
    }
}

impl From<BlockHp> for RawHp {
    fn from(hp: BlockHp) -> Self {
        match hp {
            BlockHp::Hits(n) => RawHp::Count(n),
            BlockHp::Unbreakable => RawHp::Tag(BlockHp::UNBREAKABLE_TAG.to_string()),
        }
    }
}

/// Result of one resolved hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unbreakable; the ball bounced and nothing else changed
    Deflected,
    Damaged { remaining: u8 },
    /// hp reached zero; the block leaves the field this frame
    Destroyed { drop: Option<PowerUpKind> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub line_width: f32,
    pub hp: BlockHp,
    /// Eligible to drop a power-up when destroyed
    pub power_up: bool,
}

impl Block {
    pub fn new(pos: Vec2, width: f32, height: f32, line_width: f32, hp: BlockHp) -> Self {
        Self {
            pos,
            width,
            height,
            line_width,
            hp,
            power_up: false,
        }
    }

    pub fn with_power_up(mut self, power_up: bool) -> Self {
        self.power_up = power_up;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    /// Bounding box including half the stroke
    pub fn bounds(&self) -> Aabb {
        Aabb::from_rect(self.pos, self.width, self.height).inflate(self.line_width / 2.0)
    }

    /// Box-vs-box approximation of circle-vs-rectangle; loose at the corners
    pub fn contains_ball(&self, ball: &Ball) -> bool {
        Aabb::around_circle(ball.pos, ball.effective_size()).overlaps(&self.bounds())
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == BlockHp::Hits(0)
    }

    /// Unbreakable blocks never have to be cleared
    pub fn counts_for_clear(&self) -> bool {
        self.hp != BlockHp::Unbreakable
    }

    /// Take one hit. A flagged block reaching zero rolls for a drop: a roll
    /// below `spawn_chance` drops a pickup, and a second roll picks its kind.
    pub fn apply_hit(&mut self, rng: &mut impl RandomSource, spawn_chance: f32) -> HitOutcome {
        let remaining = match self.hp {
            BlockHp::Unbreakable => return HitOutcome::Deflected,
            BlockHp::Hits(n) => n.saturating_sub(1),
        };
        self.hp = BlockHp::Hits(remaining);

        if remaining > 0 {
            return HitOutcome::Damaged { remaining };
        }

        let drop = if self.power_up && rng.roll() < spawn_chance {
            Some(PowerUpKind::pick(rng.roll()))
        } else {
            None
        };
        HitOutcome::Destroyed { drop }
    }
}
