pub mod compute;
pub mod config;
pub mod end_game;
pub mod entities;
pub mod error;
pub mod leaderboard;
pub mod run;
pub mod scheduler;
pub mod spawner;
pub mod store;
