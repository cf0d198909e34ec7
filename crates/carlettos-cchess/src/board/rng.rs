//! Deterministic random numbers shared by both players.
//!
//! Each generator is a linear congruential generator that advances once per
//! movement, turn or round, so every client derives the same values from a
//! serialized board.

use rand::Rng;
use serde::{Deserialize, Serialize};

const LCG_A: u64 = 1_103_515_245;
const LCG_C: u64 = 12_345;
const LCG_M: u64 = 32_768;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomNumberGenerator {
    pub seed: u64,
    pub a: u64,
    pub c: u64,
    pub m: u64,
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self {
            seed: 1,
            a: LCG_A,
            c: LCG_C,
            m: LCG_M,
        }
    }
}

impl RandomNumberGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: seed % LCG_M,
            ..Default::default()
        }
    }

    pub fn advance(&mut self) {
        self.seed = (self.a.wrapping_mul(self.seed).wrapping_add(self.c)) % self.m;
    }

    pub fn get_u64(&self) -> u64 {
        self.seed
    }

    /// Current value in `[0, 1)`.
    pub fn get_f64(&self) -> f64 {
        self.seed as f64 / self.m as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRng {
    movement_rng: RandomNumberGenerator,
    turn_rng: RandomNumberGenerator,
    round_rng: RandomNumberGenerator,
}

impl Default for BoardRng {
    fn default() -> Self {
        let mut rng = rand::rng();
        Self::with_seeds(rng.random(), rng.random(), rng.random())
    }
}

impl BoardRng {
    pub fn with_seeds(movement: u64, turn: u64, round: u64) -> Self {
        Self {
            movement_rng: RandomNumberGenerator::with_seed(movement),
            turn_rng: RandomNumberGenerator::with_seed(turn),
            round_rng: RandomNumberGenerator::with_seed(round),
        }
    }

    pub fn movement(&self) -> f64 {
        self.movement_rng.get_f64()
    }

    pub fn turn(&self) -> f64 {
        self.turn_rng.get_f64()
    }

    pub fn round(&self) -> f64 {
        self.round_rng.get_f64()
    }

    /// Seed for derived generators, changes every movement.
    pub fn seed(&self) -> u64 {
        self.movement_rng.get_u64() ^ (self.turn_rng.get_u64() << 15) ^ (self.round_rng.get_u64() << 30)
    }

    pub fn next_movement(&mut self) {
        self.movement_rng.advance();
    }

    pub fn next_turn(&mut self) {
        self.turn_rng.advance();
    }

    pub fn next_round(&mut self) {
        self.round_rng.advance();
    }
}
