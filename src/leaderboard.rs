//! Local leaderboard persisted as JSON
//!
//! Lives in the platform data directory (e.g. ~/.local/share/gridfall/)
//! next to nothing else; settings keep their own TOML file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Number of entries kept on the board
const MAX_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Date as ISO string
    pub date: String,
}

/// Top-ten score table, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "gridfall", "gridfall").map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn file_path() -> Option<PathBuf> {
        Self::data_dir().map(|dir| dir.join("leaderboard.json"))
    }

    /// Load the leaderboard from disk, or start empty
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save the leaderboard to disk
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::data_dir() else {
            return Err("Could not determine data directory".to_string());
        };

        let Some(path) = Self::file_path() else {
            return Err("Could not determine leaderboard path".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create data dir: {}", e))?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write leaderboard: {}", e))?;

        Ok(())
    }

    /// Record a finished game. Empty names become "Anonymous".
    pub fn submit(&mut self, name: &str, score: u64, lines: u32, level: u32) {
        let name = name.trim();
        let name = if name.is_empty() { "Anonymous" } else { name };

        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score,
            lines,
            level,
            date: date_now(),
        });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Best score on record
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Would this score make the table?
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.len() < MAX_ENTRIES
            || self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }
}

/// Simple date string without external crate
fn date_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();

    // Convert to rough date (good enough for display)
    let days = secs / 86400;
    let years = 1970 + days / 365;
    let remaining_days = days % 365;
    let month = remaining_days / 30 + 1;
    let day = remaining_days % 30 + 1;

    format!("{:04}-{:02}-{:02}", years, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_sorts_descending() {
        let mut board = Leaderboard::default();
        board.submit("a", 100, 1, 1);
        board.submit("b", 300, 3, 1);
        board.submit("c", 200, 2, 1);
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(board.best(), Some(300));
    }

    #[test]
    fn test_table_caps_at_ten() {
        let mut board = Leaderboard::default();
        for i in 0..15 {
            board.submit("p", i * 10, 0, 1);
        }
        assert_eq!(board.entries.len(), 10);
        // lowest five fell off
        assert_eq!(board.entries.last().map(|e| e.score), Some(50));
    }

    #[test]
    fn test_empty_name_becomes_anonymous() {
        let mut board = Leaderboard::default();
        board.submit("   ", 10, 0, 1);
        assert_eq!(board.entries[0].name, "Anonymous");
    }

    #[test]
    fn test_qualifies() {
        let mut board = Leaderboard::default();
        assert!(board.qualifies(0));
        for i in 0..10 {
            board.submit("p", 100 + i, 0, 1);
        }
        assert!(board.qualifies(200));
        assert!(!board.qualifies(50));
    }
}
