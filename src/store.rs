//! Leaderboard persistence.
//!
//! One indented JSON file, `{"entries": [{"playerName": .., "score": ..}]}`,
//! under a data directory resolved once at startup.  Reads never fail from
//! the caller's point of view; writes report errors and leave the decision
//! to swallow them with the caller.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::leaderboard::{LeaderboardEntry, LeaderboardTable};

pub const LEADERBOARD_FILE: &str = "leaderboard.json";
const APP_DIR: &str = "space_explorer";

/// On-disk shape of the leaderboard.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LeaderboardFile {
    entries: Vec<LeaderboardEntry>,
}

/// Platform data directory: `$XDG_DATA_HOME/space_explorer`, else
/// `$HOME/.local/share/space_explorer`, else a directory beside the binary's
/// working directory.
pub fn default_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }
    PathBuf::from(format!("{APP_DIR}-data"))
}

#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    /// Store backed by exactly `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `leaderboard.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(LEADERBOARD_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted table, falling back to an empty one when the file
    /// is missing, unreadable or malformed.
    pub fn load(&self) -> LeaderboardTable {
        match self.try_load() {
            Ok(Some(table)) => {
                debug!(path = %self.path.display(), entries = table.len(), "leaderboard loaded");
                table
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no leaderboard yet");
                LeaderboardTable::new()
            }
            Err(e) => {
                error!("error loading leaderboard: {e}");
                LeaderboardTable::new()
            }
        }
    }

    /// Strict load: `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<LeaderboardTable>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let file: LeaderboardFile =
            serde_json::from_str(&text).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(LeaderboardTable::from_entries(file.entries)))
    }

    /// Overwrite the file with `table`, creating the data directory if
    /// needed.
    pub fn save(&self, table: &LeaderboardTable) -> Result<(), StoreError> {
        let file = LeaderboardFile {
            entries: table.entries().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "leaderboard saved");
        Ok(())
    }
}
