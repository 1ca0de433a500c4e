//! Entity types shared by the simulation and the renderer. Plain data.

/// What an actor is, for collision dispatch and spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
    Missile,
    /// Collectible; worth points and sometimes a life.
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    GameOver,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub lives: u32,
    /// Set for a short window after being struck; contacts are ignored.
    pub invincible: bool,
}

// ── Drifting actors ───────────────────────────────────────────────────────────

/// Unit direction of travel.  `(0, 1)` is straight down the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
    pub dx: f32,
    pub dy: f32,
}

impl Heading {
    /// Heading `degrees` away from straight down; positive drifts right.
    pub fn from_degrees(degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Heading {
            dx: rad.sin(),
            dy: rad.cos(),
        }
    }

    pub const DOWN: Heading = Heading { dx: 0.0, dy: 1.0 };
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub heading: Heading,
    /// Sprite rotation in degrees, [0, 360).
    pub spin: f32,
    /// Seconds since spawn.
    pub age: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub heading: Heading,
    pub age: f32,
}

// ── Projectiles & effects ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Missile {
    pub x: f32,
    pub y: f32,
    pub age: f32,
}

/// A brief visual explosion left where something was destroyed.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    /// Seconds left on screen.
    pub remaining: f32,
}

// ── Background ────────────────────────────────────────────────────────────────

/// Two stacked panels that scroll down and leapfrog each other.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    /// Top edge of each panel, in rows (may be negative while above view).
    pub panels: [f32; 2],
    pub panel_height: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything on the play field.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub missiles: Vec<Missile>,
    pub stars: Vec<Star>,
    pub explosions: Vec<Explosion>,
    pub background: Background,
    pub status: GameStatus,
    /// Seconds of simulated play.
    pub elapsed: f32,
    pub width: u16,
    pub height: u16,
}
