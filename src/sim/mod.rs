//! Simulation module
//!
//! All gameplay logic lives here. It must stay free of rendering, input and
//! storage concerns:
//! - Delta time is supplied by the caller
//! - Randomness only through `RandomSource`
//! - Stable iteration order (layout order for blocks)

pub mod ball;
pub mod block;
pub mod collision;
pub mod motion;
pub mod paddle;
pub mod power_up;
pub mod rng;
pub mod state;
pub mod tick;

pub use ball::{Ball, Contact, Floor};
pub use block::{Block, BlockBounce, BlockHp, HitOutcome};
pub use collision::{Aabb, paddle_catches, paddle_offset};
pub use motion::Motion;
pub use paddle::Paddle;
pub use power_up::{PowerUp, PowerUpKind};
pub use rng::{RandomSource, ScriptedRolls};
pub use state::{Phase, Round, RoundEvent};
pub use tick::tick;
