//! Carlettos Chess - classic chess rules
//!
//! The board is an 8x8 grid addressed by `(x, y)` squares with
//! `index = x + 8 * y`. Black starts on rows 0 and 1, white on rows 6 and 7,
//! and white moves first. Interaction follows a two-click protocol: the first
//! click selects a piece and highlights where it may go, the second click on a
//! highlighted square performs the move.

pub mod board;
pub mod piece;

pub use board::{Board, BOARD_SIZE, Square, index_to_point, point_to_index, starting_pieces};
pub use piece::{Color, Piece};
