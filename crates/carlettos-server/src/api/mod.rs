//! HTTP API handlers
//!
//! - `task` - the todo list
//! - `chess` - the shared classic chess board
//! - `vote` - per-voter ballots
//! - `leaderboard` - 2048 highscores
//! - `health` - liveness and metrics
//! - `route` - registration of every handler

pub mod chess;
pub mod health;
pub mod leaderboard;
pub mod route;
pub mod task;
pub mod vote;
