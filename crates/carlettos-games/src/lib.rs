//! Carlettos Games - the single-player games of the web client
//!
//! - [`c2048`]: 2048 on a 4x4 grid, with an energy heuristic that drives automove
//! - [`life`]: Conway's game of life on a toroidal grid

pub mod c2048;
pub mod life;

pub use c2048::{C2048, Move, Tile};
pub use life::Life;
