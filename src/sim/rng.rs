//! Random rolls used by the round (power-up drops)

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform rolls in [0, 1)
pub trait RandomSource {
    fn roll(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn roll(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded PCG generator, the default source for a round
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of rolls, cycling when exhausted. Used to script drops.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: Vec<f32>,
    next: usize,
}

impl ScriptedRolls {
    /// `None` if `rolls` is empty
    pub fn new(rolls: Vec<f32>) -> Option<Self> {
        if rolls.is_empty() {
            return None;
        }
        Some(Self { rolls, next: 0 })
    }
}

impl RandomSource for ScriptedRolls {
    fn roll(&mut self) -> f32 {
        let value = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        value
    }
}
