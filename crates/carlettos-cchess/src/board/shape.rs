//! Board outlines built from rectangles.

use serde::{Deserialize, Serialize};

use crate::pos::Pos;

/// Axis-aligned rectangle anchored at its south-west corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub anchor: Pos,
    pub width: usize,
    pub height: usize,
}

impl Square {
    pub fn new(anchor: Pos, width: usize, height: usize) -> Self {
        Self {
            anchor,
            width,
            height,
        }
    }

    /// First row above the square.
    pub fn north(&self) -> usize {
        self.anchor.y + self.height
    }

    /// First column right of the square.
    pub fn east(&self) -> usize {
        self.anchor.x + self.width
    }

    pub fn south(&self) -> usize {
        self.anchor.y
    }

    pub fn west(&self) -> usize {
        self.anchor.x
    }

    pub fn contains(&self, pos: &Pos) -> bool {
        (self.west()..self.east()).contains(&pos.x) && (self.south()..self.north()).contains(&pos.y)
    }

    /// Column by column, south to north within each column.
    pub fn points_iter(&self) -> impl Iterator<Item = Pos> + '_ {
        (self.west()..self.east())
            .flat_map(move |x| (self.south()..self.north()).map(move |y| Pos::new(x, y)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub squares: Vec<Square>,
}

impl Shape {
    pub fn new(squares: Vec<Square>) -> Self {
        Self { squares }
    }

    pub fn default_chessboard() -> Self {
        Shape::new(vec![Square::new(Pos::new(0, 0), 8, 8)])
    }

    pub fn cchessboard() -> Self {
        Shape::new(vec![Square::new(Pos::new(0, 0), 16, 17)])
    }

    /// An 8x8 board with its four 2x2 corners cut out.
    pub fn cross_shape() -> Self {
        Shape::new(vec![
            Square::new(Pos::new(2, 0), 4, 2),
            Square::new(Pos::new(0, 2), 2, 4),
            Square::new(Pos::new(2, 2), 4, 4),
            Square::new(Pos::new(2, 6), 4, 2),
            Square::new(Pos::new(6, 2), 2, 4),
        ])
    }

    pub fn contains(&self, pos: &Pos) -> bool {
        self.squares.iter().any(|square| square.contains(pos))
    }

    pub fn points_iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.squares.iter().flat_map(|square| square.points_iter())
    }

    pub fn height(&self) -> usize {
        self.squares
            .iter()
            .map(Square::north)
            .max()
            .unwrap_or_default()
    }
}
