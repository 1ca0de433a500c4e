mod display;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;

use space_explorer::config::GameConfig;
use space_explorer::end_game::{EndGameSession, Panel};
use space_explorer::run::{RunContext, ScoreSlots};
use space_explorer::store::{default_data_dir, LeaderboardStore};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between missiles while Space is held.
/// 6 frames @ 30 FPS ≈ 5 shots/sec.
const SHOOT_COOLDOWN: u32 = 6;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn is_ctrl_c(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('c')) && modifiers.contains(KeyModifiers::CONTROL)
}

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "space_explorer", about = "Terminal space shooter with a top-5 leaderboard")]
struct Args {
    /// Directory holding leaderboard.json (defaults to the platform data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the default game tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Log file (defaults to <data-dir>/space_explorer.log).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_logging(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::options().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    let (width, height) = terminal::size()?;
    display::render_menu(out, width, height)?;

    // Block until the user makes a choice
    loop {
        let (code, modifiers) = match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => (code, modifiers),
            Ok(_) => continue,
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        };
        if is_ctrl_c(&code, modifiers) {
            return Ok(MenuResult::Quit);
        }
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                display::render_tutorial(out, width, height)?;
                wait_for_key(rx);
                display::render_menu(out, width, height)?;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
}

fn wait_for_key(rx: &mpsc::Receiver<Event>) {
    while let Ok(event) = rx.recv() {
        if let Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            return;
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RunExit {
    GameOver,
    Quit,
}

/// Plays one run to completion.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame we check which keys are
/// still "fresh" (within `HOLD_WINDOW` frames) and apply all their effects
/// simultaneously, so Space and the arrows can be held together.
fn game_loop<W: Write>(
    out: &mut W,
    run: &mut RunContext,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<RunExit> {
    let dt = FRAME.as_secs_f32();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    if is_ctrl_c(&code, modifiers) {
                        return Ok(RunExit::Quit);
                    }
                    match code {
                        KeyCode::Esc => run.set_paused(!run.is_paused()),
                        KeyCode::Char('q') | KeyCode::Char('Q') if run.is_paused() => {
                            return Ok(RunExit::Quit);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if !run.is_paused() {
            let left = any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            );
            let right = any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            );
            let up = any_held(
                &key_frame,
                &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
                frame,
            );
            let down = any_held(
                &key_frame,
                &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
                frame,
            );
            let dx = right as i8 as f32 - left as i8 as f32;
            let dy = down as i8 as f32 - up as i8 as f32;
            if dx != 0.0 || dy != 0.0 {
                run.move_player(dx, dy, dt);
            }

            if shoot_cooldown == 0 && is_held(&key_frame, &KeyCode::Char(' '), frame) {
                run.shoot();
                shoot_cooldown = SHOOT_COOLDOWN;
            }
            shoot_cooldown = shoot_cooldown.saturating_sub(1);

            if run.step(dt, rng).is_some() {
                display::render(out, run)?;
                return Ok(RunExit::GameOver);
            }
        }

        display::render(out, run)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── End of run ────────────────────────────────────────────────────────────────

enum EndChoice {
    PlayAgain,
    Exit,
}

fn end_game_loop<W: Write>(
    out: &mut W,
    session: &mut EndGameSession,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<EndChoice> {
    let dt = FRAME.as_secs_f32();

    loop {
        let frame_start = Instant::now();

        while let Ok(Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            if is_ctrl_c(&code, modifiers) {
                return Ok(EndChoice::Exit);
            }
            match (session.panel(), code) {
                (Panel::NameInput, KeyCode::Enter) => {
                    let _ = session.submit_name();
                }
                (Panel::NameInput, KeyCode::Esc) => {
                    let _ = session.skip();
                }
                (Panel::NameInput, KeyCode::Backspace) => session.pop_char(),
                (Panel::NameInput, KeyCode::Char(c)) => session.push_char(c),
                (Panel::Leaderboard, KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc) => {
                    session.hide_leaderboard();
                }
                (Panel::GameOver, KeyCode::Char('l') | KeyCode::Char('L')) => {
                    session.show_leaderboard();
                }
                (_, KeyCode::Char('r') | KeyCode::Char('R')) => return Ok(EndChoice::PlayAgain),
                (_, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) => {
                    return Ok(EndChoice::Exit);
                }
                _ => {}
            }
        }

        session.advance(dt);

        let (width, height) = terminal::size()?;
        display::render_end_game(out, session, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Resolved once; never re-resolved mid-run.
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("space_explorer.log"));
    if let Err(e) = init_logging(&log_path) {
        eprintln!("logging disabled: cannot open {}: {e}", log_path.display());
    }

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = LeaderboardStore::in_dir(&data_dir);
    info!(path = %store.path().display(), "leaderboard location");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = play(&mut out, &rx, &config, &store, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!("terminal error: {e}");
    }
    result
}

fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    store: &LeaderboardStore,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    if let MenuResult::Quit = show_menu(out, rx)? {
        return Ok(());
    }

    loop {
        let (width, height) = terminal::size()?;
        let mut run = RunContext::start(config, width, height);
        let mut slots = ScoreSlots::new();

        match game_loop(out, &mut run, rx, rng)? {
            RunExit::Quit => {
                let outcome = run.on_run_end(&mut slots);
                info!(score = outcome.score, "quit during run");
                return Ok(());
            }
            RunExit::GameOver => {
                let _ = run.on_run_end(&mut slots);
            }
        }
        drop(run);

        let mut session = EndGameSession::open(store.clone(), &slots, config);
        match end_game_loop(out, &mut session, rx)? {
            EndChoice::PlayAgain => continue,
            EndChoice::Exit => return Ok(()),
        }
    }
}
