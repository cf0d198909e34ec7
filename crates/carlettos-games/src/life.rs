//! Conway's game of life on a toroidal grid.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: usize = 40;
pub const DEFAULT_HEIGHT: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Life {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Default for Life {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Life {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Wraps `(x, y)` around the grid; `None` on an empty grid.
    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        Some(x + y * self.width)
    }

    fn alive_at(&self, x: isize, y: isize) -> bool {
        self.index(x, y)
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.alive_at(x as isize, y as isize)
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if let Some(cell) = self
            .index(x as isize, y as isize)
            .and_then(|i| self.cells.get_mut(i))
        {
            *cell = alive;
        }
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = !*cell;
        }
    }

    /// Kills every cell.
    pub fn reset(&mut self) {
        self.cells.fill(false);
    }

    /// Makes each cell alive with probability `p`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, p: f64) {
        let p = p.clamp(0.0, 1.0);
        for cell in self.cells.iter_mut() {
            *cell = rng.random_bool(p);
        }
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    fn neighbours(&self, x: isize, y: isize) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) && self.alive_at(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advances one generation: live cells with fewer than two or more than
    /// three neighbours die, dead cells with exactly three come alive.
    pub fn step(&mut self) {
        let mut next = self.cells.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let (x, y) = (x as isize, y as isize);
                let alive = self.alive_at(x, y);
                let n = self.neighbours(x, y);
                if let Some(cell) = self.index(x, y).and_then(|i| next.get_mut(i)) {
                    *cell = matches!((alive, n), (true, 2) | (true, 3) | (false, 3));
                }
            }
        }
        self.cells = next;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_default_size() {
        let life = Life::default();
        assert_eq!(life.width(), 40);
        assert_eq!(life.height(), 30);
        assert_eq!(life.alive_count(), 0);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut life = Life::new(5, 5);
        for x in 1..4 {
            life.set(x, 2, true);
        }
        life.step();
        assert!(life.is_alive(2, 1) && life.is_alive(2, 2) && life.is_alive(2, 3));
        assert_eq!(life.alive_count(), 3);
        life.step();
        assert!(life.is_alive(1, 2) && life.is_alive(3, 2));
    }

    #[test]
    fn test_block_is_stable_across_wrap() {
        let mut life = Life::new(6, 6);
        for (x, y) in [(0, 0), (5, 0), (0, 5), (5, 5)] {
            life.set(x, y, true);
        }
        let before = life.clone();
        life.step();
        assert_eq!(life, before);
    }

    #[test]
    fn test_lonely_cell_dies() {
        let mut life = Life::new(4, 4);
        life.toggle(5);
        assert_eq!(life.alive_count(), 1);
        life.step();
        assert_eq!(life.alive_count(), 0);
    }

    #[test]
    fn test_empty_grid() {
        let mut life = Life::new(0, 5);
        life.set(1, 1, true);
        life.toggle(0);
        life.step();
        assert!(!life.is_alive(0, 0));
        assert_eq!(life.alive_count(), 0);
        assert!(life.cells().is_empty());
    }

    #[test]
    fn test_randomize_and_reset() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut life = Life::default();
        life.randomize(&mut rng, 0.5);
        let alive = life.alive_count();
        assert!(alive > 300 && alive < 900, "alive = {}", alive);
        life.reset();
        assert_eq!(life.alive_count(), 0);
    }
}
