//! High score leaderboard
//!
//! Keeps the top 10 runs, best first, along with the level reached and the
//! player name at the time.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};
use crate::settings::DEFAULT_PLAYER_NAME;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Survival ticks
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Player name, if one was set
    #[serde(default)]
    pub name: Option<String>,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub const STORAGE_KEY: &'static str = "jumping_potato_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run, keeping the list sorted. Returns the rank achieved.
    ///
    /// Ties go below existing entries with the same score.
    pub fn add_score(
        &mut self,
        score: u64,
        level: u32,
        name: Option<String>,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                name,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("New high score #{}: {} (level {})", rank, score, level);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// One display line per entry, best first, e.g. `"1. Spud  900  L2  3 mins ago"`
    pub fn leaderboard_lines(&self, now: f64) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{}. {}  {}  L{}  {}",
                    i + 1,
                    entry.name.as_deref().unwrap_or(DEFAULT_PLAYER_NAME),
                    entry.score,
                    entry.level,
                    format_age(entry.timestamp, now)
                )
            })
            .collect()
    }

    pub fn load(storage: &dyn Storage) -> Self {
        let mut scores: Self = persistence::load_or_default(storage, Self::STORAGE_KEY);
        // Stored data may have been edited by hand
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match persistence::save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let mins = ((now - timestamp) / 60_000.0).max(0.0);
    let hours = mins / 60.0;
    let days = hours / 24.0;

    if days >= 1.0 {
        match days.floor() as i64 {
            1 => "Yesterday".to_string(),
            d => format!("{} days ago", d),
        }
    } else if hours >= 1.0 {
        match hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            h => format!("{} hours ago", h),
        }
    } else if mins >= 1.0 {
        match mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            m => format!("{} mins ago", m),
        }
    } else {
        "Just now".to_string()
    }
}
