//! One playthrough, from spawn to game over.
//!
//! `RunContext` owns everything scoped to a run: the play field, the score,
//! the spawn processes and the one-shot timers.  Ending the run tears all of
//! it down together and hands the final score over through `ScoreSlots`.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use crate::compute::{self, Contact, TickReport};
use crate::config::GameConfig;
use crate::entities::{ActorKind, GameState, GameStatus};
use crate::scheduler::{TaskId, Timers};
use crate::spawner::{roll_spawn, SpawnScheduler};

/// Slot the final score of a run is written to.
pub const LAST_SCORE_KEY: &str = "LastScore";

// ── Score ─────────────────────────────────────────────────────────────────────

/// The run's score; never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunScore(u32);

impl RunScore {
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(points);
    }

    /// Subtract `points`, stopping at zero.
    pub fn deduct(&mut self, points: u32) {
        self.0 = self.0.saturating_sub(points);
    }
}

// ── Score slots ───────────────────────────────────────────────────────────────

/// Small integer key-value store carried from a finished run to the
/// end-of-run screen.
#[derive(Clone, Debug, Default)]
pub struct ScoreSlots {
    values: HashMap<String, u32>,
}

impl ScoreSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_int(&self, key: &str, default: u32) -> u32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    pub fn set_int(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunTimer {
    InvincibilityEnd,
}

/// Handed back when a run finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct RunContext {
    config: GameConfig,
    state: GameState,
    score: RunScore,
    spawner: SpawnScheduler,
    timers: Timers<RunTimer>,
    invincibility: Option<TaskId>,
    outcome: Option<RunOutcome>,
}

impl RunContext {
    /// Fresh run: full lives, zero score, spawn rate back at its start.
    pub fn start(config: &GameConfig, width: u16, height: u16) -> Self {
        info!(width, height, "run started");
        Self {
            config: config.clone(),
            state: compute::init_state(width, height, config),
            score: RunScore::default(),
            spawner: SpawnScheduler::start(&config.spawn),
            timers: Timers::new(),
            invincibility: None,
            outcome: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.state.status == GameStatus::Paused
    }

    /// Seconds of invulnerability left, if any.
    pub fn invincibility_left(&self) -> Option<f32> {
        self.invincibility
            .and_then(|id| self.timers.remaining(id))
            .map(|secs| secs as f32)
    }

    /// Pausing freezes time: nothing moves, spawns or expires.
    pub fn set_paused(&mut self, paused: bool) {
        if self.is_over() {
            return;
        }
        self.state.status = if paused {
            GameStatus::Paused
        } else {
            GameStatus::Playing
        };
        debug!(paused, "pause toggled");
    }

    pub fn move_player(&mut self, dx: f32, dy: f32, dt: f32) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        self.state = compute::move_player(&self.state, dx, dy, dt, &self.config);
    }

    pub fn shoot(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        self.state = compute::player_shoot(&self.state);
    }

    /// Instantiate one spawned actor at a random spot along the top edge.
    pub fn on_spawn_tick(&mut self, kind: ActorKind, rng: &mut impl Rng) {
        let order = roll_spawn(kind, &self.config.spawn, self.state.width, rng);
        debug!(?kind, x = order.x, heading = order.heading_deg, "spawn");
        self.state = compute::spawn_actor(&self.state, &order);
    }

    /// Advance the run by `dt` seconds.  Returns the outcome on the step
    /// the last life is lost.
    pub fn step(&mut self, dt: f32, rng: &mut impl Rng) -> Option<RunOutcome> {
        if self.state.status != GameStatus::Playing {
            return None;
        }

        let mut spawns = Vec::new();
        self.spawner.advance(dt, &mut spawns);
        for kind in spawns {
            self.on_spawn_tick(kind, rng);
        }

        for fired in self.timers.advance(dt as f64) {
            match fired.label {
                RunTimer::InvincibilityEnd => {
                    self.state.player.invincible = false;
                    self.invincibility = None;
                }
            }
        }

        let (next, report) = compute::tick(&self.state, dt, &self.config, rng);
        self.state = next;
        self.apply(&report);

        if self.state.status == GameStatus::GameOver {
            return Some(self.finish());
        }
        None
    }

    fn apply(&mut self, report: &TickReport) {
        for contact in &report.contacts {
            match contact {
                Contact::EnemyShot => self.score.add(self.config.enemy_score),
                Contact::StarCollected => self.score.add(self.config.star_score),
                Contact::PlayerStruck => {
                    debug!(lives = self.state.player.lives, "player struck");
                    if self.state.player.lives > 0 {
                        if let Some(old) = self.invincibility.take() {
                            let _ = self.timers.cancel(old);
                        }
                        self.invincibility = Some(self.timers.after(
                            self.config.player.invincibility_secs as f64,
                            RunTimer::InvincibilityEnd,
                        ));
                    }
                }
            }
        }
        for _ in 0..report.escaped {
            self.score.deduct(self.config.escape_penalty);
        }
    }

    /// Stop the run: freeze the field and cancel every pending timer.
    fn finish(&mut self) -> RunOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.state.status = GameStatus::GameOver;
        self.spawner.teardown();
        let _ = self.timers.cancel_all();
        self.invincibility = None;

        let outcome = RunOutcome {
            score: self.score.value(),
        };
        info!(
            score = outcome.score,
            elapsed = self.state.elapsed,
            "game over"
        );
        self.outcome = Some(outcome);
        outcome
    }

    /// End the run (game over or quit) and publish the final score under
    /// `LAST_SCORE_KEY`.
    pub fn on_run_end(&mut self, slots: &mut ScoreSlots) -> RunOutcome {
        let outcome = self.finish();
        slots.set_int(LAST_SCORE_KEY, outcome.score);
        outcome
    }

    /// Add points directly, without a collision.  Nothing in the game loop
    /// calls this; it puts a run's score in a known state.
    pub fn add_score(&mut self, points: u32) {
        self.score.add(points);
    }

    /// Take points away directly, stopping at zero.  Escaped enemies go
    /// through the same saturating deduction inside `step`.
    pub fn deduct_score(&mut self, points: u32) {
        self.score.deduct(points);
    }
}
