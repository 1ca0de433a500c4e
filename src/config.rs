//! Game tuning. Every number the simulation reads lives here.
//!
//! Defaults reproduce the shipped balance.  A JSON file passed with
//! `--config` may override any subset of fields; missing fields keep their
//! default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Spawning ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between enemy spawns at multiplier 1.0.
    pub base_interval: f32,
    pub start_multiplier: f32,
    /// Added to the multiplier on every ramp tick.
    pub ramp_step: f32,
    /// Seconds between ramp ticks.
    pub ramp_period: f32,
    pub max_multiplier: f32,
    /// Seconds between star spawns (never ramps).
    pub star_interval: f32,
    /// Spawned actors head straight down ± this many degrees.
    pub max_heading_deg: f32,
    /// Horizontal spawn band as fractions of the play-field width.
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_interval: 2.0,
            start_multiplier: 1.0,
            ramp_step: 0.2,
            ramp_period: 10.0,
            max_multiplier: 3.0,
            star_interval: 7.0,
            max_heading_deg: 20.0,
            spawn_min_x: 0.1,
            spawn_max_x: 0.9,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Ship speed in cells per second.
    pub speed: f32,
    pub start_lives: u32,
    pub max_lives: u32,
    /// Missile speed in rows per second.
    pub missile_speed: f32,
    pub missile_lifetime: f32,
    /// Seconds of invulnerability after being struck.
    pub invincibility_secs: f32,
    /// Chance that a collected star also restores one life.
    pub heart_chance: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 24.0,
            start_lives: 3,
            max_lives: 5,
            missile_speed: 30.0,
            missile_lifetime: 5.0,
            invincibility_secs: 2.0,
            heart_chance: 0.25,
        }
    }
}

// ── Whole game ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    /// Enemy speed along its heading, in cells per second.
    pub enemy_speed: f32,
    /// Enemy sprite rotation in degrees per second.
    pub enemy_spin: f32,
    pub star_speed: f32,
    /// Enemies and stars are removed after this many seconds.
    pub actor_lifetime: f32,
    /// Background scroll speed in rows per second.
    pub scroll_speed: f32,
    pub enemy_score: u32,
    pub star_score: u32,
    /// Deducted when an enemy slips past the bottom edge.
    pub escape_penalty: u32,
    /// Delay before the name prompt replaces the game-over panel.
    pub name_prompt_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            enemy_speed: 6.0,
            enemy_spin: 180.0,
            star_speed: 4.0,
            actor_lifetime: 10.0,
            scroll_speed: 2.0,
            enemy_score: 10,
            star_score: 25,
            escape_penalty: 5,
            name_prompt_delay: 2.0,
        }
    }
}

impl GameConfig {
    /// Read a JSON override file and validate the merged result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spawn = &self.spawn;
        let positive = [
            ("spawn.base_interval", spawn.base_interval),
            ("spawn.ramp_period", spawn.ramp_period),
            ("spawn.star_interval", spawn.star_interval),
            ("spawn.start_multiplier", spawn.start_multiplier),
            ("player.missile_lifetime", self.player.missile_lifetime),
            ("actor_lifetime", self.actor_lifetime),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if spawn.ramp_step < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawn.ramp_step must not be negative, got {}",
                spawn.ramp_step
            )));
        }
        if spawn.max_multiplier > spawn.start_multiplier && !(spawn.ramp_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spawn.ramp_step must be positive to ramp from {} to {}",
                spawn.start_multiplier, spawn.max_multiplier
            )));
        }
        if spawn.max_multiplier < spawn.start_multiplier {
            return Err(ConfigError::Invalid(format!(
                "spawn.max_multiplier ({}) is below spawn.start_multiplier ({})",
                spawn.max_multiplier, spawn.start_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&spawn.spawn_min_x)
            || !(0.0..=1.0).contains(&spawn.spawn_max_x)
            || spawn.spawn_min_x > spawn.spawn_max_x
        {
            return Err(ConfigError::Invalid(format!(
                "spawn band [{}, {}] must be an ordered range within [0, 1]",
                spawn.spawn_min_x, spawn.spawn_max_x
            )));
        }
        if !(0.0..=1.0).contains(&self.player.heart_chance) {
            return Err(ConfigError::Invalid(format!(
                "player.heart_chance must be a probability, got {}",
                self.player.heart_chance
            )));
        }
        if self.player.start_lives == 0 || self.player.start_lives > self.player.max_lives {
            return Err(ConfigError::Invalid(format!(
                "player.start_lives ({}) must be in 1..={}",
                self.player.start_lives, self.player.max_lives
            )));
        }
        Ok(())
    }
}
