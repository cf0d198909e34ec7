//! Records exchanged between the API process, its storage and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of votes a single voter may cast.
pub const MAX_VOTES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedRows {
    pub rows_affected: u64,
}

impl AffectedRows {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: usize,
}

/// The votes cast by one voter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub id: String,
    pub votes: Vec<Vote>,
}

impl Votes {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            votes: Vec::new(),
        }
    }

    pub fn contains(&self, vote_id: usize) -> bool {
        self.votes.iter().any(|v| v.id == vote_id)
    }

    /// Casts a vote. Returns false when the vote was already cast or the
    /// voter has no votes left.
    pub fn add(&mut self, vote_id: usize) -> bool {
        if self.votes.len() >= MAX_VOTES || self.contains(vote_id) {
            return false;
        }
        self.votes.push(Vote { id: vote_id });
        true
    }

    /// Withdraws a vote. Returns false if it was never cast.
    pub fn remove(&mut self, vote_id: usize) -> bool {
        let before = self.votes.len();
        self.votes.retain(|v| v.id != vote_id);
        before != self.votes.len()
    }
}

/// A finished 2048 game submitted to the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: usize,
    pub max_tile: usize,
    pub min_energy: isize,
    pub max_energy: isize,
}
