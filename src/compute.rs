//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the tuning and an RNG handle) and returns
//! a brand-new `GameState`.  Side effects are limited to the injected RNG.
//! Score bookkeeping is left to the caller through `TickReport`.

use std::collections::HashSet;

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    ActorKind, Background, Enemy, Explosion, GameState, GameStatus, Heading, Missile, Player,
    Star,
};
use crate::spawner::SpawnOrder;

/// Seconds an explosion stays on screen.
const EXPLOSION_SECS: f32 = 0.5;

/// Terminal rows are roughly twice as tall as columns, so vertical travel
/// is halved to keep on-screen speed even.
const ROW_ASPECT: f32 = 0.5;

// ── Play-field geometry ──────────────────────────────────────────────────────
//
// Row 0 is the HUD, row 1 the top border, rows 2..=height-3 the play area,
// row height-2 the bottom border and row height-1 the controls hint.

pub fn field_top(_state: &GameState) -> f32 {
    2.0
}

pub fn field_bottom(state: &GameState) -> f32 {
    state.height as f32 - 3.0
}

pub fn field_left(_state: &GameState) -> f32 {
    1.0
}

pub fn field_right(state: &GameState) -> f32 {
    state.width as f32 - 2.0
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state for a run on a terminal of the given size.
pub fn init_state(width: u16, height: u16, config: &GameConfig) -> GameState {
    let panel_height = height.saturating_sub(4).max(1) as f32;
    GameState {
        player: Player {
            x: (width / 2) as f32,
            y: height.saturating_sub(4) as f32, // 2-row sprite sits above the border
            lives: config.player.start_lives,
            invincible: false,
        },
        enemies: Vec::new(),
        missiles: Vec::new(),
        stars: Vec::new(),
        explosions: Vec::new(),
        background: Background {
            panels: [2.0, 2.0 - panel_height],
            panel_height,
        },
        status: GameStatus::Playing,
        elapsed: 0.0,
        width,
        height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Move the ship along `(dx, dy)` (each in -1..=1) for `dt` seconds,
/// clamped so the whole 3×2 sprite stays inside the play field.
pub fn move_player(
    state: &GameState,
    dx: f32,
    dy: f32,
    dt: f32,
    config: &GameConfig,
) -> GameState {
    let step = config.player.speed * dt;
    let min_x = field_left(state) + 1.0;
    let max_x = (field_right(state) - 1.0).max(min_x);
    let min_y = field_top(state);
    let max_y = (field_bottom(state) - 1.0).max(min_y);

    let x = (state.player.x + dx.clamp(-1.0, 1.0) * step).clamp(min_x, max_x);
    let y = (state.player.y + dy.clamp(-1.0, 1.0) * step * ROW_ASPECT).clamp(min_y, max_y);

    GameState {
        player: Player {
            x,
            y,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Launch a missile from the ship's nose.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut missiles = state.missiles.clone();
    missiles.push(Missile {
        x: state.player.x.round(),
        y: state.player.y - 1.0,
        age: 0.0,
    });
    GameState {
        missiles,
        ..state.clone()
    }
}

/// Place a spawned actor at the top edge.  Only enemies and stars spawn;
/// other kinds leave the state untouched.
pub fn spawn_actor(state: &GameState, order: &SpawnOrder) -> GameState {
    let heading = Heading::from_degrees(order.heading_deg);
    let x = order
        .x
        .clamp(field_left(state), field_right(state).max(field_left(state)));
    let y = field_top(state);
    let mut next = state.clone();
    match order.kind {
        ActorKind::Enemy => next.enemies.push(Enemy {
            x,
            y,
            heading,
            spin: 0.0,
            age: 0.0,
        }),
        ActorKind::Star => next.stars.push(Star {
            x,
            y,
            heading,
            age: 0.0,
        }),
        ActorKind::Player | ActorKind::Missile => {}
    }
    next
}

// ── Collision dispatch ───────────────────────────────────────────────────────

/// The meaning of two actors touching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// A missile hit an enemy; both are destroyed.
    EnemyShot,
    /// An enemy rammed the ship.
    PlayerStruck,
    /// The ship picked up a star.
    StarCollected,
}

pub fn resolve_contact(a: ActorKind, b: ActorKind) -> Option<Contact> {
    match (a, b) {
        (ActorKind::Missile, ActorKind::Enemy) | (ActorKind::Enemy, ActorKind::Missile) => {
            Some(Contact::EnemyShot)
        }
        (ActorKind::Player, ActorKind::Enemy) | (ActorKind::Enemy, ActorKind::Player) => {
            Some(Contact::PlayerStruck)
        }
        (ActorKind::Player, ActorKind::Star) | (ActorKind::Star, ActorKind::Player) => {
            Some(Contact::StarCollected)
        }
        _ => None,
    }
}

/// Half-width and height (in cells) of each actor's sprite.
fn extent(kind: ActorKind) -> (f32, f32) {
    match kind {
        ActorKind::Player | ActorKind::Enemy => (1.0, 2.0),
        ActorKind::Missile | ActorKind::Star => (0.0, 1.0),
    }
}

#[derive(Clone, Copy, Debug)]
struct Body {
    kind: ActorKind,
    index: usize,
    x: f32,
    y: f32,
}

fn overlaps(a: &Body, b: &Body) -> bool {
    let (aw, ah) = extent(a.kind);
    let (bw, bh) = extent(b.kind);
    let x_hit = (a.x - b.x).abs() <= aw + bw + 0.5;
    let y_hit = a.y < b.y + bh && b.y < a.y + ah;
    x_hit && y_hit
}

/// What happened during one tick, for the run to score.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub contacts: Vec<Contact>,
    /// Enemies that slipped past the bottom edge.
    pub escaped: u32,
    /// Lives restored by collected stars.
    pub hearts: u32,
}

// ── Per-frame tick (RNG is injected) ──────────────────────────────

/// Advance the simulation by `dt` seconds.  All randomness comes through
/// `rng` so callers control determinism.
pub fn tick(
    state: &GameState,
    dt: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> (GameState, TickReport) {
    let mut report = TickReport::default();
    let top = field_top(state);
    let bottom = field_bottom(state);
    let left = field_left(state);
    let right = field_right(state);

    // ── 1. Scroll the background ─────────────────────────────────────────────
    let background = scroll_background(&state.background, top, config.scroll_speed * dt);

    // ── 2. Missiles fly up until they leave or expire ────────────────────────
    let missiles: Vec<Missile> = state
        .missiles
        .iter()
        .map(|m| Missile {
            y: m.y - config.player.missile_speed * dt * ROW_ASPECT,
            age: m.age + dt,
            ..m.clone()
        })
        .filter(|m| m.y >= top && m.age < config.player.missile_lifetime)
        .collect();

    // ── 3. Enemies drift along their heading and spin ────────────────────────
    let mut enemies = Vec::with_capacity(state.enemies.len());
    for e in &state.enemies {
        let moved = Enemy {
            x: e.x + e.heading.dx * config.enemy_speed * dt,
            y: e.y + e.heading.dy * config.enemy_speed * dt * ROW_ASPECT,
            spin: (e.spin + config.enemy_spin * dt).rem_euclid(360.0),
            age: e.age + dt,
            ..e.clone()
        };
        if moved.age >= config.actor_lifetime {
            continue;
        }
        if moved.y > bottom {
            report.escaped += 1;
            continue;
        }
        if moved.x < left || moved.x > right {
            continue;
        }
        enemies.push(moved);
    }

    // ── 4. Stars drift the same way but leave silently ───────────────────────
    let stars: Vec<Star> = state
        .stars
        .iter()
        .map(|s| Star {
            x: s.x + s.heading.dx * config.star_speed * dt,
            y: s.y + s.heading.dy * config.star_speed * dt * ROW_ASPECT,
            age: s.age + dt,
            ..s.clone()
        })
        .filter(|s| {
            s.age < config.actor_lifetime && s.y <= bottom && s.x >= left && s.x <= right
        })
        .collect();

    // ── 5. Age explosions ────────────────────────────────────────────────────
    let mut explosions: Vec<Explosion> = state
        .explosions
        .iter()
        .map(|x| Explosion {
            remaining: x.remaining - dt,
            ..x.clone()
        })
        .filter(|x| x.remaining > 0.0)
        .collect();

    // ── 6. Contacts ──────────────────────────────────────────────────────────
    let mut bodies = vec![Body {
        kind: ActorKind::Player,
        index: 0,
        x: state.player.x,
        y: state.player.y,
    }];
    bodies.extend(enemies.iter().enumerate().map(|(index, e)| Body {
        kind: ActorKind::Enemy,
        index,
        x: e.x,
        y: e.y,
    }));
    bodies.extend(missiles.iter().enumerate().map(|(index, m)| Body {
        kind: ActorKind::Missile,
        index,
        x: m.x,
        y: m.y,
    }));
    bodies.extend(stars.iter().enumerate().map(|(index, s)| Body {
        kind: ActorKind::Star,
        index,
        x: s.x,
        y: s.y,
    }));

    let mut player = state.player.clone();
    let mut gone: HashSet<(ActorKind, usize)> = HashSet::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (bodies[i], bodies[j]);
            if gone.contains(&(a.kind, a.index)) || gone.contains(&(b.kind, b.index)) {
                continue;
            }
            let Some(contact) = resolve_contact(a.kind, b.kind) else {
                continue;
            };
            if !overlaps(&a, &b) {
                continue;
            }
            let other = if a.kind == ActorKind::Player { b } else { a };
            match contact {
                Contact::EnemyShot => {
                    let enemy = if a.kind == ActorKind::Enemy { a } else { b };
                    gone.insert((a.kind, a.index));
                    gone.insert((b.kind, b.index));
                    explosions.push(Explosion {
                        x: enemy.x,
                        y: enemy.y,
                        remaining: EXPLOSION_SECS,
                    });
                }
                Contact::PlayerStruck => {
                    if player.invincible || player.lives == 0 {
                        continue;
                    }
                    gone.insert((other.kind, other.index));
                    player.lives -= 1;
                    player.invincible = true;
                    explosions.push(Explosion {
                        x: player.x,
                        y: player.y,
                        remaining: EXPLOSION_SECS,
                    });
                }
                Contact::StarCollected => {
                    gone.insert((other.kind, other.index));
                    if player.lives < config.player.max_lives
                        && rng.gen_bool(config.player.heart_chance)
                    {
                        player.lives += 1;
                        report.hearts += 1;
                    }
                }
            }
            report.contacts.push(contact);
        }
    }

    let enemies = survivors(enemies, ActorKind::Enemy, &gone);
    let missiles = survivors(missiles, ActorKind::Missile, &gone);
    let stars = survivors(stars, ActorKind::Star, &gone);

    // ── 7. Status ────────────────────────────────────────────────────────────
    let status = if player.lives == 0 {
        GameStatus::GameOver
    } else {
        state.status
    };

    let next = GameState {
        player,
        enemies,
        missiles,
        stars,
        explosions,
        background,
        status,
        elapsed: state.elapsed + dt,
        ..state.clone()
    };
    (next, report)
}

fn survivors<T>(items: Vec<T>, kind: ActorKind, gone: &HashSet<(ActorKind, usize)>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !gone.contains(&(kind, *i)))
        .map(|(_, item)| item)
        .collect()
}

/// Scroll both panels down by `distance`; a panel wholly below the field is
/// stacked back on top of the other one.
pub fn scroll_background(background: &Background, top: f32, distance: f32) -> Background {
    let h = background.panel_height;
    let mut panels = background.panels.map(|y| y + distance);
    if panels[0] >= top + h {
        panels[0] = panels[1] - h;
    }
    if panels[1] >= top + h {
        panels[1] = panels[0] - h;
    }
    Background {
        panels,
        panel_height: h,
    }
}
