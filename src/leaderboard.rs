//! Top-five leaderboard ranking.
//!
//! A `LeaderboardTable` is always sorted by descending score and never holds
//! more than `CAPACITY` entries.  Tables are values: `submit` returns a new
//! table and leaves the original alone.

use serde::{Deserialize, Serialize};

pub const CAPACITY: usize = 5;
pub const MAX_NAME_CHARS: usize = 15;
pub const DEFAULT_NAME: &str = "Anonymous";

/// Trim, substitute the default for an empty name, and keep at most
/// `MAX_NAME_CHARS` characters.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}

/// One ranked record.  Fields are private: entries are replaced, never
/// edited, and every name passes through `normalize_name`, including names
/// read back from disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct LeaderboardEntry {
    #[serde(rename = "playerName")]
    player_name: String,
    score: u32,
}

/// Entry exactly as stored, before normalization.
#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "playerName")]
    player_name: String,
    score: u32,
}

impl From<RawEntry> for LeaderboardEntry {
    fn from(raw: RawEntry) -> Self {
        LeaderboardEntry::new(&raw.player_name, raw.score)
    }
}

impl LeaderboardEntry {
    /// Build an entry with a normalized name.
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            player_name: normalize_name(name),
            score,
        }
    }

    pub fn name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaderboardTable {
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank arbitrary entries: sort descending by score and keep the top
    /// `CAPACITY`.  Equal scores keep their incoming order.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(CAPACITY);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= CAPACITY
    }

    /// Score of the last ranked slot when the table is full.
    pub fn cutoff(&self) -> Option<u32> {
        if self.is_full() {
            self.entries.get(CAPACITY - 1).map(LeaderboardEntry::score)
        } else {
            None
        }
    }

    /// Does `score` earn a slot?  Always while the table has room; otherwise
    /// only when strictly above the cutoff (a tie does not displace).
    pub fn qualifies(&self, score: u32) -> bool {
        match self.cutoff() {
            None => true,
            Some(cutoff) => score > cutoff,
        }
    }

    /// Insert a new entry and re-rank.  An incumbent with an equal score
    /// stays ahead of the newcomer.
    pub fn submit(&self, name: &str, score: u32) -> LeaderboardTable {
        let mut entries = self.entries.clone();
        entries.push(LeaderboardEntry::new(name, score));
        Self::from_entries(entries)
    }

    /// Exactly `CAPACITY` display rows, `"{rank}. {name} - {score}"` or a
    /// placeholder for empty ranks.
    pub fn format_rows(&self) -> [String; CAPACITY] {
        std::array::from_fn(|i| match self.entries.get(i) {
            Some(entry) => format!("{}. {} - {}", i + 1, entry.name(), entry.score()),
            None => format!("{}. --- - ---", i + 1),
        })
    }
}
