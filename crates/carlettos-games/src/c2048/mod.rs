//! 2048 on a 4x4 grid.
//!
//! Tiles hold an exponent (`value = 1 << exp`, `0` means empty). Row `y = 0`
//! is the top of the board, so `Move::Up` slides tiles toward `y = 0`.

mod energy;

use std::cmp::Ordering;

use carlettos_common::LeaderboardEntry;
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use energy::{Energy, FullEnergy};

/// Side length of the grid.
pub const L: usize = 4;

const CELLS: usize = L * L;

/// Probability that a tile spawned after a move is a 4 instead of a 2.
pub const SPAWN_FOUR_CHANCE: f64 = 0.1;

/// A grid cell. Equality and ordering only look at the exponent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tile {
    pub exp: u8,
    pub is_merged: bool,
}

impl Tile {
    pub fn is_empty(&self) -> bool {
        self.exp == 0
    }

    pub fn value(&self) -> usize {
        if self.is_empty() { 0 } else { 1 << self.exp }
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.exp == other.exp
    }
}

impl Eq for Tile {}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.exp.cmp(&other.exp)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Cell indices of line `n`, starting at the edge tiles slide toward.
    fn line(self, n: usize) -> [usize; L] {
        std::array::from_fn(|k| match self {
            Move::Left => n * L + k,
            Move::Right => n * L + (L - 1 - k),
            Move::Up => k * L + n,
            Move::Down => (L - 1 - k) * L + n,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct C2048 {
    grid: [Tile; CELLS],
    has_moved: bool,
    energies: Vec<isize>,
    score: usize,
}

impl C2048 {
    /// A fresh game with two 2-tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut game = Self::default();
        game.spawn_tile(rng, 0.0);
        game.spawn_tile(rng, 0.0);
        game
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.grid
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn energies(&self) -> &[isize] {
        &self.energies
    }

    pub fn set_tile(&mut self, pos: usize, exp: u8) {
        if let Some(tile) = self.grid.get_mut(pos) {
            tile.exp = exp;
        }
    }

    /// Places a tile on a random empty cell: a 4 with probability `chance`,
    /// otherwise a 2. Energy is recorded before and after.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R, chance: f64) {
        self.energies.push(self.energy().sum());
        let exp = if rng.random_bool(chance.clamp(0.0, 1.0)) { 2 } else { 1 };
        let empty = self.grid.iter_mut().filter(|tile| tile.is_empty()).choose(rng);
        if let Some(tile) = empty {
            tile.exp = exp;
            self.energies.push(self.energy().sum());
        }
    }

    /// Slides every line in the direction of `mv`. Each tile merges at most once.
    pub fn apply(&mut self, mv: Move) {
        for n in 0..L {
            let line = mv.line(n);
            for k in 1..L {
                if self.grid[line[k]].is_empty() {
                    continue;
                }
                for c in (1..=k).rev() {
                    if !self.advance(line[c], line[c - 1]) {
                        break;
                    }
                }
            }
        }
    }

    /// Moves or merges the tile on `from` one cell onto `to`.
    fn advance(&mut self, from: usize, to: usize) -> bool {
        let (source, target) = (self.grid[from], self.grid[to]);
        if target.exp == source.exp && !target.is_merged && !source.is_merged {
            self.grid[to] = Tile {
                exp: target.exp + 1,
                is_merged: true,
            };
        } else if target.is_empty() {
            self.grid[to] = source;
        } else {
            return false;
        }
        self.grid[from] = Tile::default();
        self.has_moved = true;
        true
    }

    /// Scores the merges of the last move and clears the per-move flags.
    pub fn reset(&mut self) {
        for tile in self.grid.iter_mut() {
            if tile.is_merged {
                self.score += 1 << tile.exp;
            }
            tile.is_merged = false;
        }
        self.has_moved = false;
    }

    /// Plays a move. Returns false if nothing moved, in which case no tile spawns.
    pub fn play<R: Rng + ?Sized>(&mut self, mv: Move, rng: &mut R) -> bool {
        self.apply(mv);
        if !self.has_moved {
            return false;
        }
        self.spawn_tile(rng, SPAWN_FOUR_CHANCE);
        self.reset();
        true
    }

    pub fn clone_move(&self, mv: Move) -> Self {
        let mut clone = self.clone();
        clone.apply(mv);
        clone
    }

    /// Plays the move that leaves the lowest total energy, if any move is possible.
    pub fn automove<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Move> {
        let (mv, best) = Move::ALL
            .into_iter()
            .map(|mv| (mv, self.clone_move(mv)))
            .filter(|(_, game)| game.has_moved)
            .min_by_key(|(_, game)| game.energy().sum())?;
        debug!(?mv, energy = best.energy().sum(), "automove");
        *self = best;
        self.spawn_tile(rng, SPAWN_FOUR_CHANCE);
        self.reset();
        Some(mv)
    }

    /// True when the grid is full and no two neighbours are equal.
    pub fn is_lose(&self) -> bool {
        if self.grid.iter().any(Tile::is_empty) {
            return false;
        }
        for y in 0..L {
            for x in 0..L {
                let i = x + y * L;
                if x + 1 < L && self.grid[i] == self.grid[i + 1] {
                    return false;
                }
                if y + 1 < L && self.grid[i] == self.grid[i + L] {
                    return false;
                }
            }
        }
        true
    }

    pub fn highest(&self) -> Tile {
        self.grid.iter().copied().max().unwrap_or_default()
    }

    pub fn max_tile(&self) -> usize {
        self.highest().value()
    }

    pub fn avg_energy(&self) -> isize {
        if self.energies.is_empty() {
            return 0;
        }
        self.energies.iter().sum::<isize>() / self.energies.len() as isize
    }

    pub fn min_energy(&self) -> isize {
        self.energies.iter().copied().min().unwrap_or_default()
    }

    pub fn max_energy(&self) -> isize {
        self.energies.iter().copied().max().unwrap_or_default()
    }

    fn neighbour(&self, i: usize, dx: isize, dy: isize) -> Option<u8> {
        let x = (i % L).checked_add_signed(dx).filter(|x| *x < L)?;
        let y = (i / L).checked_add_signed(dy).filter(|y| *y < L)?;
        Some(self.grid[x + y * L].exp)
    }

    pub fn full_energy_at(&self, i: usize) -> FullEnergy {
        let exp = self.grid[i].exp;
        if exp == 0 {
            return FullEnergy {
                epsilon: -1,
                ..FullEnergy::default()
            };
        }
        let north = self.neighbour(i, 0, -1);
        let south = self.neighbour(i, 0, 1);
        let west = self.neighbour(i, -1, 0);
        let east = self.neighbour(i, 1, 0);
        FullEnergy {
            epsilon: exp as isize,
            phi_north: energy::phi(exp, north),
            phi_south: energy::phi(exp, south),
            phi_west: energy::phi(exp, west),
            phi_east: energy::phi(exp, east),
            xi_vertical: energy::xi(exp, north, south),
            xi_horizontal: energy::xi(exp, west, east),
        }
    }

    pub fn energy_at(&self, i: usize) -> Energy {
        self.full_energy_at(i).reduce()
    }

    pub fn energy(&self) -> Energy {
        let mut energy = Energy::default();
        for i in 0..CELLS {
            energy += self.energy_at(i);
        }
        energy
    }

    /// Leaderboard submission for the game as it stands.
    pub fn leaderboard_entry(&self, name: impl Into<String>) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.into(),
            score: self.score,
            max_tile: self.max_tile(),
            min_energy: self.min_energy(),
            max_energy: self.max_energy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn grid(exps: [u8; CELLS]) -> C2048 {
        let mut game = C2048::default();
        for (i, exp) in exps.into_iter().enumerate() {
            game.set_tile(i, exp);
        }
        game
    }

    fn exps(game: &C2048) -> Vec<u8> {
        game.tiles().iter().map(|t| t.exp).collect()
    }

    fn total_value(game: &C2048) -> usize {
        game.tiles().iter().map(Tile::value).sum()
    }

    #[test]
    fn test_new_game_has_two_twos() {
        let mut rng = StdRng::seed_from_u64(7);
        let game = C2048::new(&mut rng);
        let filled: Vec<_> = game.tiles().iter().filter(|t| !t.is_empty()).collect();
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|t| t.exp == 1));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_left_merges_pairs_once() {
        let mut game = grid([1, 1, 1, 1, 1, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        game.apply(Move::Left);
        assert_eq!(
            exps(&game),
            vec![2, 2, 0, 0, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        game.reset();
        assert_eq!(game.score(), 4 + 4 + 4);
        assert!(!game.has_moved());
    }

    #[test]
    fn test_right_and_vertical_moves() {
        let mut game = grid([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        game.apply(Move::Right);
        assert_eq!(game.tiles()[3].exp, 1);
        game.apply(Move::Down);
        assert_eq!(game.tiles()[15].exp, 1);
        game.apply(Move::Left);
        assert_eq!(game.tiles()[12].exp, 1);
        game.apply(Move::Up);
        assert_eq!(game.tiles()[0].exp, 1);
    }

    #[test]
    fn test_blocked_move_does_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = grid([0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!game.play(Move::Right, &mut rng));
        assert_eq!(game.tiles().iter().filter(|t| !t.is_empty()).count(), 1);
    }

    #[test]
    fn test_play_spawns_and_scores() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = grid([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(game.play(Move::Left, &mut rng));
        assert_eq!(game.score(), 4);
        assert_eq!(game.tiles().iter().filter(|t| !t.is_empty()).count(), 2);
        assert!(game.tiles().iter().all(|t| !t.is_merged));
    }

    #[test]
    fn test_apply_conserves_value() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut game = C2048::default();
            for i in 0..CELLS {
                game.set_tile(i, rng.random_range(0..4));
            }
            for mv in Move::ALL {
                let before = total_value(&game);
                game.apply(mv);
                assert_eq!(total_value(&game), before);
                game.reset();
            }
        }
    }

    #[test]
    fn test_is_lose() {
        let checkerboard = grid([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1]);
        assert!(checkerboard.is_lose());

        let mut open = checkerboard.clone();
        open.set_tile(1, 1);
        assert!(!open.is_lose());

        let mut hole = checkerboard.clone();
        hole.set_tile(5, 0);
        assert!(!hole.is_lose());
    }

    #[test]
    fn test_energy() {
        let empty = C2048::default();
        assert_eq!(empty.energy().sum(), -16);

        let corner = grid([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let full = corner.full_energy_at(0);
        assert_eq!(full.epsilon, 1);
        assert_eq!(full.phi_east, Some(1));
        assert_eq!(full.phi_south, Some(1));
        assert_eq!(full.phi_north, None);
        assert_eq!(full.xi_horizontal, None);
        assert_eq!(corner.energy().sum(), 1 + 2 - 15);

        let gradient = grid([1, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(gradient.full_energy_at(1).xi_horizontal, Some(-2));
    }

    #[test]
    fn test_automove() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = grid([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        // sliding both 2s down keeps them adjacent and equal, which beats merging
        assert_eq!(game.automove(&mut rng), Some(Move::Down));
        assert_eq!(game.score(), 0);
        assert_eq!(game.tiles()[12].exp, 1);
        assert_eq!(game.tiles()[13].exp, 1);

        let mut locked = grid([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1]);
        assert_eq!(locked.automove(&mut rng), None);
    }

    #[test]
    fn test_leaderboard_entry() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = grid([3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        game.play(Move::Left, &mut rng);
        let entry = game.leaderboard_entry("carla");
        assert_eq!(entry.name, "carla");
        assert_eq!(entry.score, 16);
        assert_eq!(entry.max_tile, 16);
        assert!(entry.min_energy <= entry.max_energy);
    }

    #[test]
    fn test_highest_ordering() {
        let game = grid([1, 5, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(game.highest().exp, 5);
        assert_eq!(game.max_tile(), 32);
        assert_eq!(Tile { exp: 2, is_merged: true }, Tile { exp: 2, is_merged: false });
    }
}
