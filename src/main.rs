use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::compute::{fit_playfield, init_state, resize, tick};
use invaders::display::{self, TerminalSurface};
use invaders::entities::{GameState, GameStatus};
use invaders::input::{Control, InputAdapter, InputState};
use invaders::{Config, GameError};

enum SessionEnd {
    Quit,
    Restart,
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One update followed by one draw per frame.  Events queued by the reader
/// thread are drained at the top of the frame, so the input state is only
/// ever touched from this thread.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    state: &mut GameState,
    adapter: &mut InputAdapter,
    rx: &mpsc::Receiver<Event>,
    frame_len: Duration,
) -> Result<SessionEnd, GameError> {
    let mut input = InputState::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match adapter.handle_event(&ev, frame, &mut input) {
                Some(Control::Quit) => return Ok(SessionEnd::Quit),
                Some(Control::Restart) if state.status == GameStatus::GameOver => {
                    return Ok(SessionEnd::Restart);
                }
                Some(Control::Resize(columns, rows)) => {
                    surface.resize_terminal(columns, rows);
                    let (cw, ch) = surface.container_size();
                    *state = resize(state, cw, ch);
                    surface.set_playfield(state.width, state.height);
                    adapter.set_touch_layout(surface.touch_layout());
                }
                _ => {}
            }
        }
        adapter.expire(frame, &mut input);

        *state = tick(state, &mut input);
        display::render(surface, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

fn run<W: Write>(
    out: W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    keyboard_enhanced: bool,
) -> Result<(), GameError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (columns, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, config.cell_width, config.cell_height, columns, rows);
    let mut adapter = InputAdapter::new(keyboard_enhanced, config.hold_window_frames());

    loop {
        let (cw, ch) = surface.container_size();
        let (width, height) = fit_playfield(cw, ch);
        let mut state = init_state(width, height, &mut rng);
        surface.set_playfield(state.width, state.height);
        adapter.set_touch_layout(surface.touch_layout());

        let end = game_loop(&mut surface, &mut state, &mut adapter, rx, config.frame_duration())?;
        info!("session over after {} frames, score {}", state.frame, state.score);
        if let SessionEnd::Quit = end {
            return Ok(());
        }
    }
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &config.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_logging(&config)?;
    info!("starting with {:?}", config);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to hold windows.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    if !keyboard_enhanced {
        warn!(
            "terminal does not report key releases, using a {} ms hold window",
            config.hold_window_ms
        );
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}
