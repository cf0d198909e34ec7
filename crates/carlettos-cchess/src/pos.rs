//! Board coordinates and compass directions.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl Pos {
    #[inline(always)]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offsets the position, `None` when either coordinate leaves `usize`.
    #[inline(always)]
    pub fn shift(&self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    #[inline(always)]
    pub fn north(&self) -> Option<Self> {
        self.shift(0, 1)
    }

    #[inline(always)]
    pub fn east(&self) -> Option<Self> {
        self.shift(1, 0)
    }

    #[inline(always)]
    pub fn south(&self) -> Option<Self> {
        self.shift(0, -1)
    }

    #[inline(always)]
    pub fn west(&self) -> Option<Self> {
        self.shift(-1, 0)
    }

    pub fn direction_shift(&self, direction: &Direction) -> Option<Self> {
        let (dx, dy) = direction.vector();
        self.shift(dx, dy)
    }

    pub fn subdirection_shift(&self, subdirection: &SubDirection) -> Option<Self> {
        let (dx, dy) = subdirection.vector();
        self.shift(dx, dy)
    }

    pub fn abs_diff(&self, other: &Pos) -> Pos {
        Pos {
            x: self.x.abs_diff(other.x),
            y: self.y.abs_diff(other.y),
        }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Self) -> Self::Output {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn vector(&self) -> (isize, isize) {
        match self {
            Direction::N => (0, 1),
            Direction::E => (1, 0),
            Direction::S => (0, -1),
            Direction::W => (-1, 0),
        }
    }

    /// The direction itself plus its two diagonal neighbours.
    pub fn related_subdirections(&self) -> [SubDirection; 3] {
        match self {
            Direction::N => [SubDirection::NW, SubDirection::N, SubDirection::NE],
            Direction::E => [SubDirection::NE, SubDirection::E, SubDirection::SE],
            Direction::S => [SubDirection::SE, SubDirection::S, SubDirection::SW],
            Direction::W => [SubDirection::SW, SubDirection::W, SubDirection::NW],
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::N | Direction::S => Axis::NS,
            Direction::E | Direction::W => Axis::EW,
        }
    }
}

impl From<&Direction> for (isize, isize) {
    fn from(direction: &Direction) -> Self {
        direction.vector()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl SubDirection {
    /// Clockwise, starting at north.
    pub const ALL: [SubDirection; 8] = [
        SubDirection::N,
        SubDirection::NE,
        SubDirection::E,
        SubDirection::SE,
        SubDirection::S,
        SubDirection::SW,
        SubDirection::W,
        SubDirection::NW,
    ];

    pub fn vector(&self) -> (isize, isize) {
        match self {
            SubDirection::N => (0, 1),
            SubDirection::NE => (1, 1),
            SubDirection::E => (1, 0),
            SubDirection::SE => (1, -1),
            SubDirection::S => (0, -1),
            SubDirection::SW => (-1, -1),
            SubDirection::W => (-1, 0),
            SubDirection::NW => (-1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    NS,
    EW,
}

impl Axis {
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Axis::NS => [Direction::N, Direction::S],
            Axis::EW => [Direction::E, Direction::W],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn other(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward step; white advances north.
    pub fn forward(&self) -> isize {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}
