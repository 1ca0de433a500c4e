//! Timed spawning with a ramping rate.
//!
//! Three cooperative processes share one arena:
//!
//! * the enemy spawner waits `base_interval / multiplier` and then fires,
//! * the ramp waits `ramp_period` and then raises the multiplier by
//!   `ramp_step`, stopping for good once it reaches `max_multiplier`,
//! * the star spawner waits a fixed `star_interval` and then fires.
//!
//! The ramp is the only writer of the multiplier and the enemy spawner its
//! only reader, so no ordering beyond the arena's time order is needed.

use rand::Rng;
use tracing::debug;

use crate::config::SpawnConfig;
use crate::entities::ActorKind;
use crate::scheduler::{TaskId, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Process {
    EnemySpawn,
    Ramp,
    StarSpawn,
}

/// Shared rate parameter for the enemy spawner.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnState {
    pub base_interval: f32,
    pub ramp_step: f32,
    pub ramp_period: f32,
    pub max_multiplier: f32,
    start_multiplier: f32,
    ramp_steps: u32,
}

impl SpawnState {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            base_interval: config.base_interval,
            ramp_step: config.ramp_step,
            ramp_period: config.ramp_period,
            max_multiplier: config.max_multiplier,
            start_multiplier: config.start_multiplier,
            ramp_steps: 0,
        }
    }

    /// Current multiplier, derived from the number of ramp ticks so repeated
    /// float additions never drift.
    pub fn multiplier(&self) -> f32 {
        (self.start_multiplier + self.ramp_steps as f32 * self.ramp_step)
            .min(self.max_multiplier)
    }

    /// Seconds the enemy spawner waits at the current multiplier.
    pub fn interval(&self) -> f32 {
        self.base_interval / self.multiplier()
    }

    pub fn is_capped(&self) -> bool {
        self.multiplier() >= self.max_multiplier
    }

    /// One ramp tick; returns the new multiplier.
    fn ramp(&mut self) -> f32 {
        if !self.is_capped() {
            self.ramp_steps += 1;
        }
        self.multiplier()
    }
}

/// Owns the spawn processes of one run.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    timers: Timers<Process>,
    state: SpawnState,
    star_interval: f32,
    ramp_task: Option<TaskId>,
    torn_down: bool,
}

impl SpawnScheduler {
    /// Start all three processes; each waits before its first firing.
    pub fn start(config: &SpawnConfig) -> Self {
        let state = SpawnState::new(config);
        let mut timers = Timers::new();
        let _ = timers.after(state.interval() as f64, Process::EnemySpawn);
        let ramp_task = if state.is_capped() {
            None
        } else {
            Some(timers.after(state.ramp_period as f64, Process::Ramp))
        };
        let _ = timers.after(config.star_interval as f64, Process::StarSpawn);

        Self {
            timers,
            state,
            star_interval: config.star_interval,
            ramp_task,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    pub fn multiplier(&self) -> f32 {
        self.state.multiplier()
    }

    /// `true` while the ramp process has not yet terminated.
    pub fn is_ramping(&self) -> bool {
        self.ramp_task
            .map(|id| self.timers.is_pending(id))
            .unwrap_or(false)
    }

    pub fn is_running(&self) -> bool {
        !self.torn_down
    }

    /// Seconds of run time this scheduler has seen.
    pub fn elapsed(&self) -> f64 {
        self.timers.now()
    }

    /// Advance every process by `dt` seconds, pushing one entry onto `out`
    /// per spawn event in the order they fell due.
    pub fn advance(&mut self, dt: f32, out: &mut Vec<ActorKind>) {
        if self.torn_down {
            return;
        }
        let horizon = self.timers.now() + dt.max(0.0) as f64;

        while let Some(task) = self.timers.poll_until(horizon) {
            match task.label {
                Process::EnemySpawn => {
                    out.push(ActorKind::Enemy);
                    let wait = self.state.interval();
                    let _ = self.timers.after(wait as f64, Process::EnemySpawn);
                }
                Process::Ramp => {
                    let multiplier = self.state.ramp();
                    if self.state.is_capped() {
                        debug!(multiplier, at = task.due, "spawn ramp reached its cap");
                        self.ramp_task = None;
                    } else {
                        debug!(multiplier, at = task.due, "spawn ramp");
                        self.ramp_task =
                            Some(self.timers.after(self.state.ramp_period as f64, Process::Ramp));
                    }
                }
                Process::StarSpawn => {
                    out.push(ActorKind::Star);
                    let _ = self
                        .timers
                        .after(self.star_interval as f64, Process::StarSpawn);
                }
            }
        }

        self.timers.settle(horizon);
    }

    /// Cancel every process.  A torn-down scheduler never fires again.
    pub fn teardown(&mut self) {
        let dropped = self.timers.cancel_all();
        self.ramp_task = None;
        self.torn_down = true;
        debug!(dropped, "spawn scheduler torn down");
    }
}

// ── Spawn placement ───────────────────────────────────────────────────────────

/// Where and how a freshly spawned actor enters the field.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnOrder {
    pub kind: ActorKind,
    pub x: f32,
    /// Degrees away from straight down; positive drifts right.
    pub heading_deg: f32,
}

/// Roll a random column inside the configured band and a random heading
/// within `±max_heading_deg`.
pub fn roll_spawn(
    kind: ActorKind,
    config: &SpawnConfig,
    field_width: u16,
    rng: &mut impl Rng,
) -> SpawnOrder {
    let width = field_width as f32;
    let min_x = config.spawn_min_x * width;
    let max_x = config.spawn_max_x * width;
    let x = if max_x > min_x {
        rng.gen_range(min_x..max_x)
    } else {
        min_x
    };
    let heading_deg = if config.max_heading_deg > 0.0 {
        rng.gen_range(-config.max_heading_deg..=config.max_heading_deg)
    } else {
        0.0
    };
    SpawnOrder {
        kind,
        x,
        heading_deg,
    }
}
