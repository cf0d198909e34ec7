//! Board state and the click-driven move protocol.

use carlettos_common::CarlettosError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::piece::{Color, Piece};

pub const BOARD_SIZE: usize = 8;

/// A square as `(x, y)`.
pub type Square = (usize, usize);

pub fn index_to_point(index: usize) -> Square {
    (index % BOARD_SIZE, index / BOARD_SIZE)
}

pub fn point_to_index((x, y): Square) -> usize {
    x + y * BOARD_SIZE
}

fn on_board((x, y): Square) -> bool {
    x < BOARD_SIZE && y < BOARD_SIZE
}

fn all_squares() -> impl Iterator<Item = Square> {
    (0..BOARD_SIZE * BOARD_SIZE).map(index_to_point)
}

/// The standard starting position: black on rows 0-1, white on rows 6-7,
/// kings on column 3 and queens on column 4.
pub fn starting_pieces() -> Vec<Option<Piece>> {
    let mut pieces = vec![None; BOARD_SIZE * BOARD_SIZE];
    for (color, back, front) in [(Color::Black, 0, 1), (Color::White, 7, 6)] {
        let back_rank = [
            Piece::rook(color),
            Piece::knight(color),
            Piece::bishop(color),
            Piece::king(color),
            Piece::queen(color),
            Piece::bishop(color),
            Piece::knight(color),
            Piece::rook(color),
        ];
        for (x, piece) in back_rank.into_iter().enumerate() {
            pieces[point_to_index((x, back))] = Some(piece);
            pieces[point_to_index((x, front))] = Some(Piece::pawn(color));
        }
    }
    pieces
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub pieces: Vec<Option<Piece>>,
    pub piece_selected: Option<Square>,
    pub en_passant_square: Option<Square>,
    pub take_squares: Vec<Square>,
    pub move_squares: Vec<Square>,
    pub turn: Color,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            pieces: starting_pieces(),
            piece_selected: None,
            en_passant_square: None,
            take_squares: Vec::new(),
            move_squares: Vec::new(),
            turn: Color::White,
        }
    }
}

impl Board {
    pub fn get(&self, pos: Square) -> Option<&Piece> {
        if !on_board(pos) {
            return None;
        }
        self.pieces.get(point_to_index(pos)).and_then(Option::as_ref)
    }

    /// Resets the pieces to the starting position, keeping everything else.
    pub fn start(&mut self) {
        self.pieces = starting_pieces();
    }

    fn king_pos(&self, color: Color) -> Option<Square> {
        self.pieces
            .iter()
            .enumerate()
            .find_map(|(i, p)| match p {
                Some(piece) if piece.is_king() && piece.color() == color => {
                    Some(index_to_point(i))
                }
                _ => None,
            })
    }

    fn pieces_of(&self, color: Color) -> Vec<(Square, Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, p)| match p {
                Some(piece) if piece.color() == color => Some((index_to_point(i), piece.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether the king of `color` is attacked, regardless of whose turn it is.
    pub fn is_check(&self, color: Color) -> bool {
        let Some(king_pos) = self.king_pos(color) else {
            return false;
        };
        let mut attacked = self.clone();
        attacked.turn = color.other();
        attacked
            .pieces_of(color.other())
            .iter()
            .any(|(from, piece)| piece.can_take(&attacked, *from, king_pos))
    }

    /// Whether `color` is in check and no move of any of its pieces escapes it.
    pub fn is_check_mate(&self, color: Color) -> bool {
        if !self.is_check(color) {
            return false;
        }
        let mut side = self.clone();
        side.turn = color;
        for (from, piece) in side.pieces_of(color) {
            for to in all_squares() {
                if piece.can_move(&side, from, to) || piece.can_take(&side, from, to) {
                    let mut attempt = side.clone();
                    attempt.apply_move(from, to);
                    if !attempt.is_check(color) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// The side that delivered checkmate, if any.
    pub fn winner(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.is_check_mate(*color))
            .map(|loser| loser.other())
    }

    /// Handles a click on `pos`. Returns true if a piece moved.
    ///
    /// A move that would leave the mover's own king in check is refused and
    /// the board is left untouched.
    pub fn on_click(&mut self, pos: Square) -> bool {
        if !on_board(pos) {
            return false;
        }
        let mover = self.turn;
        let mut attempt = self.clone();
        if attempt.inner_on_click(pos) && attempt.is_check(mover) {
            debug!(?pos, color = mover.name(), "move refused, king would be in check");
            return false;
        }
        *self = attempt;
        self.turn != mover
    }

    fn inner_on_click(&mut self, pos: Square) -> bool {
        if self.move_squares.contains(&pos) || self.take_squares.contains(&pos) {
            if let Some(selected) = self.piece_selected {
                self.apply_move(selected, pos);
                self.clear_selection();
                self.turn = self.turn.other();
                return true;
            }
        }

        self.clear_selection();
        let Some(piece) = self.get(pos).cloned() else {
            self.piece_selected = Some(pos);
            return false;
        };
        if piece.color() != self.turn {
            return false;
        }
        self.piece_selected = Some(pos);
        for to in all_squares() {
            if piece.can_move(self, pos, to) {
                self.move_squares.push(to);
            }
            if piece.can_take(self, pos, to) {
                self.take_squares.push(to);
            }
        }
        false
    }

    fn clear_selection(&mut self) {
        self.move_squares.clear();
        self.take_squares.clear();
        self.piece_selected = None;
    }

    /// Moves the piece on `from` to `to`, capturing whatever stood there and
    /// removing the passed pawn on an en passant capture.
    fn apply_move(&mut self, from: Square, to: Square) {
        let Some(mut piece) = self.pieces[point_to_index(from)].take() else {
            return;
        };
        if piece.is_pawn()
            && self.en_passant_square == Some(to)
            && from.0 != to.0
            && self.get(to).is_none()
        {
            self.pieces[point_to_index((to.0, from.1))] = None;
        }
        piece.on_moved(&mut self.en_passant_square, from, to);
        self.pieces[point_to_index(to)] = Some(piece);
    }

    /// Checks that a board received from outside is structurally sound.
    pub fn validate(&self) -> Result<(), CarlettosError> {
        if self.pieces.len() != BOARD_SIZE * BOARD_SIZE {
            return Err(CarlettosError::IllegalArgument(format!(
                "board must have {} squares, got {}",
                BOARD_SIZE * BOARD_SIZE,
                self.pieces.len()
            )));
        }
        let squares = self
            .piece_selected
            .iter()
            .chain(self.en_passant_square.iter())
            .chain(self.take_squares.iter())
            .chain(self.move_squares.iter());
        for square in squares {
            if !on_board(*square) {
                return Err(CarlettosError::IllegalArgument(format!(
                    "square {:?} is outside the board",
                    square
                )));
            }
        }
        Ok(())
    }
}
