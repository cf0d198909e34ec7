//! Chess pieces and their movement rules.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    #[default]
    White,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Row delta of a single pawn step.
    fn forward(&self) -> isize {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }

    fn pawn_row(&self) -> usize {
        match self {
            Color::Black => 1,
            Color::White => 6,
        }
    }

    /// Row an en passant capture of this color lands on.
    fn en_passant_row(&self) -> usize {
        match self {
            Color::Black => 5,
            Color::White => 2,
        }
    }
}

/// A chess piece. Rooks and kings remember whether they have moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Piece {
    Pawn { color: Color },
    Knight { color: Color },
    Bishop { color: Color },
    Rook { color: Color, has_moved: bool },
    Queen { color: Color },
    King { color: Color, has_moved: bool },
}

impl Piece {
    pub fn pawn(color: Color) -> Self {
        Piece::Pawn { color }
    }

    pub fn knight(color: Color) -> Self {
        Piece::Knight { color }
    }

    pub fn bishop(color: Color) -> Self {
        Piece::Bishop { color }
    }

    pub fn rook(color: Color) -> Self {
        Piece::Rook {
            color,
            has_moved: false,
        }
    }

    pub fn queen(color: Color) -> Self {
        Piece::Queen { color }
    }

    pub fn king(color: Color) -> Self {
        Piece::King {
            color,
            has_moved: false,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Piece::Pawn { color }
            | Piece::Knight { color }
            | Piece::Bishop { color }
            | Piece::Rook { color, .. }
            | Piece::Queen { color }
            | Piece::King { color, .. } => *color,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Piece::Pawn { .. } => "pawn",
            Piece::Knight { .. } => "knight",
            Piece::Bishop { .. } => "bishop",
            Piece::Rook { .. } => "rook",
            Piece::Queen { .. } => "queen",
            Piece::King { .. } => "king",
        }
    }

    /// Style class used by the web client, e.g. `white_pawn`.
    pub fn class_name(&self) -> String {
        format!("{}_{}", self.color().name(), self.kind_name())
    }

    pub fn is_pawn(&self) -> bool {
        matches!(self, Piece::Pawn { .. })
    }

    pub fn is_king(&self) -> bool {
        matches!(self, Piece::King { .. })
    }

    /// Whether this piece, standing on `from`, may move onto the empty `to`.
    pub fn can_move(&self, board: &Board, from: Square, to: Square) -> bool {
        match (board.get(from), board.get(to)) {
            (Some(mover), None) if mover.color() == board.turn => {
                self.reaches(board, from, to, false)
            }
            _ => false,
        }
    }

    /// Whether this piece, standing on `from`, may capture on `to`.
    ///
    /// Pawns may also capture onto the en passant square while it is empty.
    pub fn can_take(&self, board: &Board, from: Square, to: Square) -> bool {
        match (board.get(from), board.get(to)) {
            (Some(mover), Some(target)) => {
                mover.color() != target.color()
                    && mover.color() == board.turn
                    && self.reaches(board, from, to, true)
            }
            (Some(mover), None) => {
                mover.color() == board.turn && self.can_take_en_passant(board, from, to)
            }
            _ => false,
        }
    }

    fn can_take_en_passant(&self, board: &Board, from: Square, to: Square) -> bool {
        match self {
            Piece::Pawn { color } => {
                board.en_passant_square == Some(to)
                    && to.1 == color.en_passant_row()
                    && self.reaches(board, from, to, true)
            }
            _ => false,
        }
    }

    /// Geometric reachability, ignoring turn and target occupancy.
    fn reaches(&self, board: &Board, from: Square, to: Square, taking: bool) -> bool {
        if from == to {
            return false;
        }
        let dx = to.0 as isize - from.0 as isize;
        let dy = to.1 as isize - from.1 as isize;
        match self {
            Piece::Pawn { color } => {
                let forward = color.forward();
                if taking {
                    dy == forward && dx.abs() == 1
                } else {
                    dx == 0
                        && (dy == forward
                            || (from.1 == color.pawn_row()
                                && dy == 2 * forward
                                && path_clear(board, from, dx, dy)))
                }
            }
            Piece::Knight { .. } => matches!((dx.abs(), dy.abs()), (1, 2) | (2, 1)),
            Piece::Bishop { .. } => dx.abs() == dy.abs() && path_clear(board, from, dx, dy),
            Piece::Rook { .. } => (dx == 0 || dy == 0) && path_clear(board, from, dx, dy),
            Piece::Queen { .. } => {
                (dx.abs() == dy.abs() || dx == 0 || dy == 0) && path_clear(board, from, dx, dy)
            }
            Piece::King { .. } => dx.abs() < 2 && dy.abs() < 2,
        }
    }

    /// Updates per-piece state after moving from `from` to `to`.
    ///
    /// Any pending en passant square expires; a pawn double step creates a new
    /// one on the square it skipped.
    pub fn on_moved(&mut self, en_passant_square: &mut Option<Square>, from: Square, to: Square) {
        *en_passant_square = None;
        match self {
            Piece::King { has_moved, .. } | Piece::Rook { has_moved, .. } => *has_moved = true,
            Piece::Pawn { color } => {
                if from.1 == color.pawn_row() && to.1.abs_diff(from.1) == 2 {
                    *en_passant_square = Some((from.0, (from.1 + to.1) / 2));
                }
            }
            _ => (),
        }
    }
}

/// True when every square strictly between `from` and `from + (dx, dy)` is empty.
fn path_clear(board: &Board, from: Square, dx: isize, dy: isize) -> bool {
    let steps = dx.abs().max(dy.abs());
    (1..steps).all(|i| {
        let x = from.0 as isize + i * dx.signum();
        let y = from.1 as isize + i * dy.signum();
        board.get((x as usize, y as usize)).is_none()
    })
}
