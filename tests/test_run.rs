use space_explorer::config::GameConfig;
use space_explorer::entities::{ActorKind, GameStatus};
use space_explorer::run::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Enemies drop straight onto the ship's column (x = 20 on a 40-wide field).
fn aimed_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.spawn.spawn_min_x = 0.5;
    cfg.spawn.spawn_max_x = 0.5;
    cfg.spawn.max_heading_deg = 0.0;
    cfg
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn run_score_never_goes_negative() {
    let mut score = RunScore::default();
    score.add(3);
    score.deduct(10);
    assert_eq!(score.value(), 0);
    score.add(7);
    score.deduct(2);
    assert_eq!(score.value(), 5);
}

#[test]
fn score_slots_fall_back_to_default() {
    let mut slots = ScoreSlots::new();
    assert_eq!(slots.get_int(LAST_SCORE_KEY, 0), 0);
    slots.set_int(LAST_SCORE_KEY, 12);
    assert_eq!(slots.get_int(LAST_SCORE_KEY, 0), 12);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

#[test]
fn start_is_a_fresh_run() {
    let run = RunContext::start(&GameConfig::default(), 40, 20);
    assert_eq!(run.score(), 0);
    assert_eq!(run.state().player.lives, 3);
    assert_eq!(run.state().status, GameStatus::Playing);
    assert_eq!(run.spawner().multiplier(), 1.0);
    assert!(!run.is_over());
}

#[test]
fn first_enemy_arrives_after_base_interval() {
    let mut run = RunContext::start(&GameConfig::default(), 40, 20);
    let mut rng = seeded_rng();
    for _ in 0..3 {
        run.step(0.5, &mut rng);
    }
    assert!(run.state().enemies.is_empty());
    run.step(0.5, &mut rng);
    assert_eq!(run.state().enemies.len(), 1);
}

#[test]
fn spawn_tick_places_actor_on_top_row() {
    let mut run = RunContext::start(&aimed_config(), 40, 20);
    run.on_spawn_tick(ActorKind::Star, &mut seeded_rng());
    let star = &run.state().stars[0];
    assert_eq!(star.x, 20.0);
    assert_eq!(star.y, 2.0);
}

#[test]
fn paused_run_does_not_advance() {
    let mut run = RunContext::start(&GameConfig::default(), 40, 20);
    let mut rng = seeded_rng();
    run.set_paused(true);
    assert!(run.is_paused());

    assert_eq!(run.step(5.0, &mut rng), None);
    run.move_player(1.0, 0.0, 1.0);
    run.shoot();
    assert_eq!(run.state().elapsed, 0.0);
    assert_eq!(run.spawner().elapsed(), 0.0);
    assert!(run.state().enemies.is_empty());
    assert!(run.state().missiles.is_empty());
    assert_eq!(run.state().player.x, 20.0);

    run.set_paused(false);
    for _ in 0..4 {
        run.step(0.5, &mut rng);
    }
    assert_eq!(run.state().enemies.len(), 1);
}

#[test]
fn escaped_enemy_costs_points() {
    let mut cfg = GameConfig::default();
    cfg.enemy_speed = 200.0;
    let mut run = RunContext::start(&cfg, 40, 20);
    let mut rng = seeded_rng();
    run.add_score(20);

    for _ in 0..8 {
        run.step(0.25, &mut rng);
    }
    assert!(run.state().enemies.is_empty());
    assert_eq!(run.score(), 15);
}

#[test]
fn deduct_score_stops_at_zero() {
    let mut run = RunContext::start(&GameConfig::default(), 40, 20);
    run.add_score(4);
    run.deduct_score(5);
    assert_eq!(run.score(), 0);
}

#[test]
fn struck_player_is_briefly_invincible() {
    let mut cfg = aimed_config();
    cfg.player.invincibility_secs = 1.0;
    let mut run = RunContext::start(&cfg, 40, 20);
    let mut rng = seeded_rng();

    for _ in 0..80 {
        run.step(0.25, &mut rng);
        if run.state().player.lives < 3 {
            break;
        }
    }
    assert_eq!(run.state().player.lives, 2);
    assert!(run.state().player.invincible);
    assert_eq!(run.invincibility_left(), Some(1.0));

    for _ in 0..4 {
        run.step(0.25, &mut rng);
    }
    assert!(!run.state().player.invincible);
    assert_eq!(run.invincibility_left(), None);
    assert_eq!(run.state().player.lives, 2);
}

#[test]
fn losing_last_life_ends_the_run() {
    let mut cfg = aimed_config();
    cfg.player.start_lives = 1;
    let mut run = RunContext::start(&cfg, 40, 20);
    let mut rng = seeded_rng();
    run.add_score(30);

    let mut outcome = None;
    for _ in 0..80 {
        outcome = run.step(0.25, &mut rng);
        if outcome.is_some() {
            break;
        }
    }
    assert_eq!(outcome, Some(RunOutcome { score: 30 }));
    assert!(run.is_over());
    assert_eq!(run.state().status, GameStatus::GameOver);
    assert!(!run.spawner().is_running());

    // A finished run stays frozen
    let elapsed = run.state().elapsed;
    assert_eq!(run.step(1.0, &mut rng), None);
    assert_eq!(run.state().elapsed, elapsed);
    run.set_paused(true);
    assert_eq!(run.state().status, GameStatus::GameOver);
}

#[test]
fn run_end_publishes_last_score() {
    let mut run = RunContext::start(&GameConfig::default(), 40, 20);
    run.add_score(35);
    let mut slots = ScoreSlots::new();

    let outcome = run.on_run_end(&mut slots);
    assert_eq!(outcome.score, 35);
    assert_eq!(slots.get_int(LAST_SCORE_KEY, 999), 35);
    assert!(!run.spawner().is_running());

    // Ending twice reports the same outcome
    run.add_score(10);
    assert_eq!(run.on_run_end(&mut slots), outcome);
    assert_eq!(slots.get_int(LAST_SCORE_KEY, 999), 35);
}

#[test]
fn restart_resets_rate_and_score() {
    let cfg = GameConfig::default();
    let mut rng = seeded_rng();
    let mut first = RunContext::start(&cfg, 40, 20);
    first.add_score(50);
    first.step(25.0, &mut rng);
    assert!(first.spawner().multiplier() > 1.0);
    first.on_run_end(&mut ScoreSlots::new());

    let second = RunContext::start(&cfg, 40, 20);
    assert_eq!(second.score(), 0);
    assert_eq!(second.spawner().multiplier(), 1.0);
    assert!(second.spawner().is_running());
}
