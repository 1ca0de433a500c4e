/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// run or screen.  No game logic is performed; this module only translates
/// state into terminal commands.

mod screens;

pub use screens::{render_end_game, render_menu, render_tutorial};

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_explorer::entities::{Enemy, Explosion, GameState, Missile, Star};
use space_explorer::run::RunContext;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BACKDROP: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_RATE: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_FLASH: Color = Color::DarkGrey;
const C_ENEMY: Color = Color::Green;
const C_MISSILE: Color = Color::Cyan;
const C_STAR: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Star pattern tiled down each background panel: (column fraction, row).
const BACKDROP: &[(f32, u16)] = &[
    (0.07, 1),
    (0.31, 3),
    (0.66, 2),
    (0.88, 6),
    (0.18, 8),
    (0.52, 10),
    (0.79, 12),
    (0.40, 15),
    (0.12, 17),
    (0.94, 19),
];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame of a run.
pub fn render<W: Write>(out: &mut W, run: &RunContext) -> std::io::Result<()> {
    let state = run.state();
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_backdrop(out, state)?;
    draw_border(out, state)?;
    draw_hud(out, run)?;

    for star in &state.stars {
        draw_star(out, star)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, state)?;
    }
    for missile in &state.missiles {
        draw_missile(out, missile)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, explosion)?;
    }

    draw_player(out, run)?;
    draw_controls_hint(out, state)?;

    if run.is_paused() {
        draw_pause_menu(out, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn inside(state: &GameState, x: f32, y: f32) -> bool {
    let (x, y) = (x.round(), y.round());
    x >= 1.0 && x <= state.width as f32 - 2.0 && y >= 2.0 && y <= state.height as f32 - 3.0
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_backdrop<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BACKDROP))?;
    let usable = state.width.saturating_sub(2) as f32;
    for panel_top in state.background.panels {
        for &(fx, row) in BACKDROP {
            if row as f32 >= state.background.panel_height {
                continue;
            }
            let x = 1.0 + fx * usable;
            let y = panel_top + row as f32;
            if inside(state, x, y) {
                out.queue(cursor::MoveTo(x as u16, y.round() as u16))?;
                out.queue(Print("·"))?;
            }
        }
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let w = state.width as usize;
    let h = state.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(state.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, run: &RunContext) -> std::io::Result<()> {
    let state = run.state();

    // Score, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", run.score())))?;

    // Spawn rate, centre
    let rate = format!("[ x{:.1} ]", run.spawner().multiplier());
    let lx = (state.width / 2).saturating_sub(rate.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_RATE))?;
    out.queue(Print(&rate))?;

    // Lives, right
    let hearts: String = "♥".repeat(state.player.lives as usize);
    let lives_text = format!("Lives:{}", hearts);
    let rx = state
        .width
        .saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, run: &RunContext) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y      (nose)
    //  /█\      ← row y+1    (fuselage + wings)
    let state = run.state();
    let p = &state.player;

    // Flash while invincible: alternate colour every tenth of a second
    let color = match run.invincibility_left() {
        Some(left) if (left * 10.0) as u32 % 2 == 0 => C_PLAYER_FLASH,
        _ => C_PLAYER,
    };
    out.queue(style::SetForegroundColor(color))?;

    let x = p.x.round() as u16;
    let y = p.y.round() as u16;
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(Print("▲"))?;

    let wing_y = y + 1;
    if wing_y < state.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), wing_y))?;
        out.queue(Print("/█\\"))?;
    }

    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, state: &GameState) -> std::io::Result<()> {
    if !inside(state, enemy.x, enemy.y) {
        return Ok(());
    }
    // Spinning sprite: four frames, one per quarter turn
    //   «◆»   ╔◆╗   «◆»   ╚◆╝
    //   ╚═╝   «=»   ╔═╗   «=»
    let frame = (enemy.spin / 90.0) as usize % 4;
    let (top, bottom) = match frame {
        0 => ("«◆»", "╚═╝"),
        1 => ("╔◆╗", "«=»"),
        2 => ("«◆»", "╔═╗"),
        _ => ("╚◆╝", "«=»"),
    };
    let lx = (enemy.x.round() as u16).saturating_sub(1).max(1);
    let y = enemy.y.round() as u16;
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(cursor::MoveTo(lx, y))?;
    out.queue(Print(top))?;
    if y + 1 < state.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(lx, y + 1))?;
        out.queue(Print(bottom))?;
    }
    Ok(())
}

fn draw_missile<W: Write>(out: &mut W, missile: &Missile) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(missile.x as u16, missile.y.round() as u16))?;
    out.queue(style::SetForegroundColor(C_MISSILE))?;
    out.queue(Print("║"))?;
    Ok(())
}

fn draw_star<W: Write>(out: &mut W, star: &Star) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(star.x.round() as u16, star.y.round() as u16))?;
    out.queue(style::SetForegroundColor(C_STAR))?;
    out.queue(Print("★"))?;
    Ok(())
}

fn draw_explosion<W: Write>(out: &mut W, explosion: &Explosion) -> std::io::Result<()> {
    // Shrinks from a burst to a spark as it fades
    let glyph = if explosion.remaining > 0.25 { "\\*/" } else { " · " };
    let lx = (explosion.x.round() as u16).saturating_sub(1).max(1);
    out.queue(cursor::MoveTo(lx, explosion.y.round() as u16))?;
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, state.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ → ↓ / WASD : Move   SPACE : Shoot   ESC : Pause"))?;
    Ok(())
}

// ── Pause overlay ─────────────────────────────────────────────────────────────

fn draw_pause_menu<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Cyan),
        ("║       PAUSED       ║", Color::Cyan),
        ("╚════════════════════╝", Color::Cyan),
        ("ESC - Resume  Q - Quit", Color::White),
    ];

    let cx = state.width / 2;
    let start_row = (state.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
