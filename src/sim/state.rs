//! Round state: every entity list, score and the current phase
//!
//! The round owns all entities outright. Entities only ever see the paddle and
//! playfield bounds they need, never the round itself.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::Block;
use super::paddle::Paddle;
use super::power_up::{PowerUp, PowerUpKind};
use super::rng::{self, RandomSource};
use crate::Bounds;
use crate::config::{BallConfig, BlockConfig, GameConfig, PowerUpConfig};
use crate::level::Level;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    MainMenu,
    /// Active gameplay
    Playing,
    /// Every breakable block cleared; waits for acknowledgment
    Won,
    /// Last ball lost; waits for acknowledgment
    Lost,
    EditMode,
    Options,
    /// Level layout could not be fetched; acknowledging retries
    LoadFailed,
}

/// Something the host may want to react to (sound, UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    PaddleHit,
    /// Hit that left the block standing
    BlockHit { breakable: bool },
    BlockDestroyed,
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    BallLost,
    LevelCleared { level: usize, next_level: usize },
    GameOver { score: u64, highscore: u64 },
}

#[derive(Debug, Clone)]
pub struct Round<R: RandomSource = Pcg32> {
    pub bounds: Bounds,
    pub ball_config: BallConfig,
    pub block_config: BlockConfig,
    pub power_up_config: PowerUpConfig,
    /// Width added per PaddleGrow pickup
    pub paddle_grow_step: f32,

    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub power_ups: Vec<PowerUp>,

    pub score: u64,
    pub highscore: u64,
    pub phase: Phase,
    /// Level being played (0-based)
    pub level_index: usize,
    pub level_count: usize,

    /// Playing, but the block layout has not arrived yet
    pub(crate) awaiting_layout: bool,
    pub(crate) rng: R,
    pub(crate) events: Vec<RoundEvent>,
}

impl Round<Pcg32> {
    /// Round drawing from a seeded PCG generator
    pub fn seeded(config: &GameConfig, bounds: Bounds, level_count: usize, highscore: u64, seed: u64) -> Self {
        Self::new(config, bounds, level_count, highscore, rng::seeded(seed))
    }
}

impl<R: RandomSource> Round<R> {
    /// A round sitting in the main menu
    pub fn new(config: &GameConfig, bounds: Bounds, level_count: usize, highscore: u64, rng: R) -> Self {
        let mut paddle = Paddle::from_config(&config.paddle);
        paddle.reset_position(bounds.width);
        Self {
            bounds,
            ball_config: config.ball.clone(),
            block_config: config.block.clone(),
            power_up_config: config.power_up.clone(),
            paddle_grow_step: config.paddle.grow_step,
            paddle,
            balls: Vec::new(),
            blocks: Vec::new(),
            power_ups: Vec::new(),
            score: 0,
            highscore,
            phase: Phase::MainMenu,
            level_index: 0,
            level_count: level_count.max(1),
            awaiting_layout: false,
            rng,
            events: Vec::new(),
        }
    }

    /// Enter Playing for the current level. Blocks are cleared until a
    /// layout is attached; the round does not advance before that.
    pub fn start(&mut self, paddle_width: f32) {
        self.paddle.set_base_width(paddle_width);
        self.blocks.clear();
        self.awaiting_layout = true;
        self.reset_life();
        self.phase = Phase::Playing;
        log::info!("Round started on level {}", self.level_index + 1);
    }

    /// Fresh ball, no pickups, paddle back to base width and centered
    pub fn reset_life(&mut self) {
        self.power_ups.clear();
        self.balls.clear();
        self.balls.push(Ball::from_config(&self.ball_config));
        self.paddle.reset_width();
        self.paddle.reset_position(self.bounds.width);
    }

    /// Replace the block list with the level's layout in one assignment
    pub fn attach_level(&mut self, level: &Level) {
        self.attach_blocks(level.build_blocks(&self.block_config));
    }

    pub fn attach_blocks(&mut self, blocks: Vec<Block>) {
        log::debug!("Attached {} blocks to level {}", blocks.len(), self.level_index + 1);
        self.blocks = blocks;
        self.awaiting_layout = false;
    }

    pub fn is_awaiting_layout(&self) -> bool {
        self.awaiting_layout
    }

    /// Blocks still required for a win
    pub fn breakable_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.counts_for_clear()).count()
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}
