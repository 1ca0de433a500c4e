//! The end-of-run screen: game-over panel, name entry and leaderboard.
//!
//! Qualification is decided once when the session opens.  The session holds
//! a single-use submission guard, so however many times submit or skip is
//! triggered, a run adds at most one leaderboard entry.

use tracing::{error, info};

use crate::config::GameConfig;
use crate::leaderboard::{LeaderboardTable, CAPACITY, DEFAULT_NAME, MAX_NAME_CHARS};
use crate::run::{ScoreSlots, LAST_SCORE_KEY};
use crate::scheduler::Timers;
use crate::store::LeaderboardStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    GameOver,
    NameInput,
    Leaderboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionTimer {
    ShowNameInput,
}

#[derive(Debug)]
pub struct EndGameSession {
    store: LeaderboardStore,
    table: LeaderboardTable,
    score: u32,
    /// Cached qualification, decided on open.
    new_high_score: bool,
    /// Single-use guard; cleared by the first submit or skip.
    entry_pending: bool,
    panel: Panel,
    name_input: String,
    timers: Timers<SessionTimer>,
}

impl EndGameSession {
    /// Load the leaderboard, read the last run's score and decide whether it
    /// qualifies.  A qualifying score schedules the name prompt.
    pub fn open(store: LeaderboardStore, slots: &ScoreSlots, config: &GameConfig) -> Self {
        let table = store.load();
        let score = slots.get_int(LAST_SCORE_KEY, 0);
        let new_high_score = table.qualifies(score);

        let mut timers = Timers::new();
        if new_high_score {
            let _ = timers.after(config.name_prompt_delay as f64, SessionTimer::ShowNameInput);
        }
        info!(score, new_high_score, "end of run");

        Self {
            store,
            table,
            score,
            new_high_score,
            entry_pending: new_high_score,
            panel: Panel::GameOver,
            name_input: String::new(),
            timers,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn table(&self) -> &LeaderboardTable {
        &self.table
    }

    /// Qualification as decided on open; unaffected by this session's own
    /// submission.
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    /// `true` until the run's entry has been submitted or skipped.
    pub fn entry_pending(&self) -> bool {
        self.entry_pending
    }

    pub fn headline(&self) -> &'static str {
        if self.new_high_score {
            "New High Score!"
        } else {
            "Game Over"
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Congratulations! You made it to the top {} with {} points!",
            CAPACITY, self.score
        )
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    /// Drive the delayed name prompt.
    pub fn advance(&mut self, dt: f32) {
        for fired in self.timers.advance(dt as f64) {
            match fired.label {
                SessionTimer::ShowNameInput => self.show_name_input(),
            }
        }
    }

    pub fn show_name_input(&mut self) {
        let _ = self.timers.cancel_all();
        self.name_input.clear();
        self.panel = Panel::NameInput;
    }

    /// Append a typed character; control characters, leading whitespace and
    /// overlong input are ignored.
    pub fn push_char(&mut self, c: char) {
        if self.panel != Panel::NameInput || c.is_control() {
            return;
        }
        if self.name_input.is_empty() && c.is_whitespace() {
            return;
        }
        if self.name_input.chars().count() < MAX_NAME_CHARS {
            self.name_input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.panel == Panel::NameInput {
            self.name_input.pop();
        }
    }

    /// Record the typed name (once per run), then show the leaderboard.
    /// Returns `true` if an entry was added.
    pub fn submit_name(&mut self) -> bool {
        let name = self.name_input.clone();
        let added = self.record(&name);
        self.panel = Panel::Leaderboard;
        added
    }

    /// Record the run anonymously (once per run), then return to the
    /// game-over panel.  Returns `true` if an entry was added.
    pub fn skip(&mut self) -> bool {
        let added = self.record(DEFAULT_NAME);
        let _ = self.timers.cancel_all();
        self.panel = Panel::GameOver;
        added
    }

    fn record(&mut self, name: &str) -> bool {
        if !self.entry_pending {
            return false;
        }
        self.entry_pending = false;
        self.table = self.table.submit(name, self.score);

        // A failed save is logged; the screen keeps the updated table.
        if let Err(e) = self.store.save(&self.table) {
            error!("error saving leaderboard: {e}");
        }
        true
    }

    pub fn show_leaderboard(&mut self) {
        self.panel = Panel::Leaderboard;
    }

    pub fn hide_leaderboard(&mut self) {
        self.panel = Panel::GameOver;
    }

    pub fn rows(&self) -> [String; CAPACITY] {
        self.table.format_rows()
    }
}
