use space_explorer::config::SpawnConfig;
use space_explorer::entities::ActorKind;
use space_explorer::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// Advance in `steps` equal frames and collect every spawn.
fn run_for(sched: &mut SpawnScheduler, dt: f32, steps: usize) -> Vec<ActorKind> {
    let mut out = Vec::new();
    for _ in 0..steps {
        sched.advance(dt, &mut out);
    }
    out
}

fn count(spawns: &[ActorKind], kind: ActorKind) -> usize {
    spawns.iter().filter(|k| **k == kind).count()
}

// ── SpawnState ────────────────────────────────────────────────────────────────

#[test]
fn fresh_state_uses_base_interval() {
    let state = SpawnState::new(&SpawnConfig::default());
    assert_eq!(state.multiplier(), 1.0);
    assert_eq!(state.interval(), 2.0);
    assert!(!state.is_capped());
}

// ── Process timing ───────────────────────────────────────────────────────────

#[test]
fn processes_wait_before_first_fire() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    assert!(run_for(&mut sched, 1.5, 1).is_empty());

    let spawns = run_for(&mut sched, 0.5, 1);
    assert_eq!(spawns, vec![ActorKind::Enemy]);
}

#[test]
fn first_ten_seconds_spawn_five_enemies_and_one_star() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    let spawns = run_for(&mut sched, 10.0, 1);
    assert_eq!(count(&spawns, ActorKind::Enemy), 5);
    assert_eq!(count(&spawns, ActorKind::Star), 1);
}

#[test]
fn frame_size_does_not_change_spawn_count() {
    let mut coarse = SpawnScheduler::start(&SpawnConfig::default());
    let mut fine = SpawnScheduler::start(&SpawnConfig::default());
    let a = run_for(&mut coarse, 10.0, 1);
    let b = run_for(&mut fine, 0.25, 40);
    assert_eq!(count(&a, ActorKind::Enemy), count(&b, ActorKind::Enemy));
    assert_eq!(count(&a, ActorKind::Star), count(&b, ActorKind::Star));
    assert_eq!(coarse.multiplier(), fine.multiplier());
}

#[test]
fn stars_follow_fixed_interval() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    // 3 stars by 21 s no matter how the enemy rate ramps
    let spawns = run_for(&mut sched, 0.5, 42);
    assert_eq!(count(&spawns, ActorKind::Star), 3);
}

// ── Ramp ──────────────────────────────────────────────────────────────────────

#[test]
fn ramp_ticks_at_its_period() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut sched, 9.5, 1);
    assert_eq!(sched.multiplier(), 1.0);
    run_for(&mut sched, 0.5, 1);
    assert!(approx(sched.multiplier(), 1.2));
    assert!(approx(sched.state().interval(), 2.0 / 1.2));
}

#[test]
fn multiplier_reaches_two_after_fifty_seconds() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut sched, 0.5, 100);
    assert!(approx(sched.multiplier(), 2.0));
    assert!(sched.is_ramping());
}

#[test]
fn ramp_stops_at_cap() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut sched, 1.0, 200);
    assert_eq!(sched.multiplier(), 3.0);
    assert!(!sched.is_ramping());
    assert!(sched.is_running());

    run_for(&mut sched, 1.0, 100);
    assert_eq!(sched.multiplier(), 3.0);
}

#[test]
fn ramped_rate_spawns_faster() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut sched, 1.0, 200);

    // Capped at x3: one enemy every 2/3 s
    let spawns = run_for(&mut sched, 0.5, 20);
    let enemies = count(&spawns, ActorKind::Enemy);
    assert!((14..=16).contains(&enemies), "got {enemies}");
}

#[test]
fn start_at_cap_never_ramps() {
    let config = SpawnConfig {
        start_multiplier: 3.0,
        ..SpawnConfig::default()
    };
    let mut sched = SpawnScheduler::start(&config);
    assert!(!sched.is_ramping());
    run_for(&mut sched, 1.0, 30);
    assert_eq!(sched.multiplier(), 3.0);
}

// ── Teardown ──────────────────────────────────────────────────────────────────

#[test]
fn torn_down_scheduler_fires_nothing() {
    let mut sched = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut sched, 1.0, 12);
    let multiplier = sched.multiplier();
    let elapsed = sched.elapsed();

    sched.teardown();
    assert!(!sched.is_running());
    assert!(!sched.is_ramping());
    assert!(run_for(&mut sched, 1.0, 60).is_empty());
    assert_eq!(sched.multiplier(), multiplier);
    assert_eq!(sched.elapsed(), elapsed);
}

#[test]
fn new_scheduler_starts_fresh() {
    let mut old = SpawnScheduler::start(&SpawnConfig::default());
    run_for(&mut old, 1.0, 60);
    old.teardown();

    let fresh = SpawnScheduler::start(&SpawnConfig::default());
    assert_eq!(fresh.multiplier(), 1.0);
    assert_eq!(fresh.elapsed(), 0.0);
    assert!(fresh.is_ramping());
}

// ── roll_spawn ────────────────────────────────────────────────────────────────

#[test]
fn rolled_spawns_stay_in_band_and_cone() {
    let config = SpawnConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let order = roll_spawn(ActorKind::Enemy, &config, 80, &mut rng);
        assert_eq!(order.kind, ActorKind::Enemy);
        assert!(order.x >= 8.0 && order.x < 72.0, "x = {}", order.x);
        assert!(order.heading_deg.abs() <= 20.0, "heading = {}", order.heading_deg);
    }
}

#[test]
fn zero_cone_heads_straight_down() {
    let config = SpawnConfig {
        max_heading_deg: 0.0,
        spawn_min_x: 0.5,
        spawn_max_x: 0.5,
        ..SpawnConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let order = roll_spawn(ActorKind::Star, &config, 40, &mut rng);
    assert_eq!(order.x, 20.0);
    assert_eq!(order.heading_deg, 0.0);
}
