//! Full-screen panels outside of play: main menu, tutorial and the
//! end-of-run screen.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_explorer::end_game::{EndGameSession, Panel};

/// Print `text` horizontally centred on `row`.
fn centred<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn finish<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Main menu ─────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = height / 2;

    centred(out, width, cy.saturating_sub(5), "★  SPACE  EXPLORER  ★", Color::Cyan)?;

    let options: &[(&str, &str, Color)] = &[
        ("ENTER", "Start", Color::Green),
        ("T    ", "Tutorial", Color::Yellow),
        ("Q    ", "Quit", Color::Red),
    ];
    for (i, (key, label, color)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo((width / 2).saturating_sub(8), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*label))?;
    }

    finish(out)
}

pub fn render_tutorial<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let start = (height / 2).saturating_sub(5);

    let lines: &[(&str, Color)] = &[
        ("HOW TO PLAY", Color::Cyan),
        ("", Color::White),
        ("← ↑ → ↓ / WASD : fly the ship", Color::White),
        ("SPACE          : fire a missile", Color::White),
        ("ESC            : pause", Color::White),
        ("", Color::White),
        ("Shoot the enemies before they slip past you.", Color::Green),
        ("Catch ★ stars for points and the odd extra life.", Color::Yellow),
        ("Enemies come faster the longer you survive.", Color::Red),
        ("", Color::White),
        ("Press any key to go back", Color::DarkGrey),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        centred(out, width, start + i as u16, text, *color)?;
    }

    finish(out)
}

// ── End of run ────────────────────────────────────────────────────────────────

pub fn render_end_game<W: Write>(
    out: &mut W,
    session: &EndGameSession,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let top = (height / 2).saturating_sub(6);

    match session.panel() {
        Panel::GameOver => {
            let headline_color = if session.is_new_high_score() {
                Color::Yellow
            } else {
                Color::Red
            };
            centred(out, width, top, "╔════════════════════╗", headline_color)?;
            centred(out, width, top + 1, session.headline(), headline_color)?;
            centred(out, width, top + 2, "╚════════════════════╝", headline_color)?;
            centred(
                out,
                width,
                top + 4,
                &format!("Score: {}", session.score()),
                Color::White,
            )?;
            centred(
                out,
                width,
                top + 6,
                "R - Play Again   L - Leaderboard   Q - Exit",
                Color::DarkGrey,
            )?;
        }
        Panel::NameInput => {
            centred(out, width, top, &session.prompt(), Color::Yellow)?;
            centred(out, width, top + 1, "Enter your name:", Color::White)?;
            let field = format!("> {}_", session.name_input());
            centred(out, width, top + 3, &field, Color::Cyan)?;
            centred(
                out,
                width,
                top + 5,
                "ENTER - Submit   ESC - Skip",
                Color::DarkGrey,
            )?;
        }
        Panel::Leaderboard => {
            centred(out, width, top, "═══  TOP 5  ═══", Color::Cyan)?;
            for (i, row) in session.rows().iter().enumerate() {
                let color = if i == 0 { Color::Yellow } else { Color::White };
                centred(out, width, top + 2 + i as u16, row, color)?;
            }
            centred(
                out,
                width,
                top + 8,
                "B - Back   R - Play Again   Q - Exit",
                Color::DarkGrey,
            )?;
        }
    }

    finish(out)
}
