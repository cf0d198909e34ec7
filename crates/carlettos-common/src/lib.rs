//! Carlettos Common - shared error types, API error codes and wire records
//!
//! Used by the persistence layer, the API server and the client so that every
//! component agrees on how a failure is classified and what a record looks like.

pub mod error;
pub mod model;

pub use error::{CarlettosError, ErrorCode};
pub use model::{AffectedRows, LeaderboardEntry, Task, Vote, Votes};

/// Namespace used when importing or connecting without an explicit one
pub const DEFAULT_NAMESPACE: &str = "root";

/// Database used when importing or connecting without an explicit one
pub const DEFAULT_DATABASE: &str = "database";
