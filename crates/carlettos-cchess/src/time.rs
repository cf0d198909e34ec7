//! Game time, counted in rounds, turns and movements.
//!
//! A movement is a single action, a turn ends once the current player has
//! spent all their movements, and a round ends once every player had a turn.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub round: usize,
    pub turn: usize,
    pub movement: usize,
}

impl Time {
    pub const fn new(round: usize, turn: usize, movement: usize) -> Self {
        Self {
            round,
            turn,
            movement,
        }
    }

    pub const fn rounds(rounds: usize) -> Self {
        Self::new(rounds, 0, 0)
    }

    pub const fn turns(turns: usize) -> Self {
        Self::new(0, turns, 0)
    }

    pub const fn movements(movements: usize) -> Self {
        Self::new(0, 0, movements)
    }

    pub fn on_round(&mut self) {
        self.round = self.round.saturating_sub(1);
    }

    pub fn on_turn(&mut self) {
        self.turn = self.turn.saturating_sub(1);
    }

    pub fn on_movement(&mut self) {
        self.movement = self.movement.saturating_sub(1);
    }

    pub fn is_zero(&self) -> bool {
        self.round == 0 && self.turn == 0 && self.movement == 0
    }

    pub fn is_round(&self) -> bool {
        self.round > 0
    }

    pub fn is_turn(&self) -> bool {
        self.turn > 0
    }

    pub fn is_movement(&self) -> bool {
        self.movement > 0
    }

    /// Counts down by the unit of time that just elapsed.
    pub fn elapse(&mut self, unit: &Time) {
        if unit.is_movement() {
            self.on_movement();
        } else if unit.is_turn() {
            self.on_turn();
        } else if unit.is_round() {
            self.on_round();
        }
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Self) -> Self::Output {
        Time::new(
            self.round + rhs.round,
            self.turn + rhs.turn,
            self.movement + rhs.movement,
        )
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Self) -> Self::Output {
        Time::new(
            self.round.saturating_sub(rhs.round),
            self.turn.saturating_sub(rhs.turn),
            self.movement.saturating_sub(rhs.movement),
        )
    }
}
