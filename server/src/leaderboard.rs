use chrono::Local;
use serde::{Deserialize, Serialize};

use common::game::GameMode;

/// How many entries a leaderboard query returns at most.
pub const LEADERBOARD_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub mode: GameMode,
    pub date: String,
}

/// In-memory score table. Submissions append; queries sort on demand, so a
/// submission is never rejected and never blocks a session.
#[derive(Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add_score(&mut self, username: &str, score: u32, mode: GameMode) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            username: username.to_string(),
            score,
            mode,
            date: Local::now().format("%Y-%m-%d").to_string(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Top entries, highest score first, optionally restricted to one mode,
    /// capped at `LEADERBOARD_LIMIT`.
    pub fn top(&self, mode: Option<GameMode>) -> Vec<LeaderboardEntry> {
        let mut selected: Vec<LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|entry| mode.is_none_or(|m| entry.mode == m))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.score.cmp(&a.score));
        selected.truncate(LEADERBOARD_LIMIT);
        selected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
