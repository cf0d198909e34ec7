//! Carlettos chess
//!
//! A chess variant played on arbitrary board shapes. Besides the classic
//! pieces it has structures (ballistas, cannons, rams), magic users and
//! demonic pieces, each with movement patterns, a special ability, types that
//! shape how they can be targeted and timed effects. Players hold mana and
//! cards, and time advances in movements, turns and rounds.
//!
//! Coordinates grow east (`x`) and north (`y`); white sits on the south side.

pub mod ability;
pub mod action;
pub mod board;
pub mod card;
pub mod controller;
pub mod error;
pub mod pattern;
pub mod piece;
pub mod pos;
pub mod time;

pub use action::{Action, Info, PaladinOrder};
pub use board::{Board, Tile};
pub use card::{Card, Cards};
pub use controller::CChess;
pub use error::CChessError;
pub use piece::{Effect, Piece, PieceData, Property, Type};
pub use pos::{Axis, Color, Direction, Pos, SubDirection};
pub use time::Time;
