//! Terminal falling-block game (default binary).
//!
//! Runs the simulation at a fixed frame cadence: drain terminal events into
//! the input source, advance the simulation once with the measured frame
//! time, then draw the snapshot through the diffing framebuffer renderer.

mod cli;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};

use blockfall::core::{BestScoreStore, GameSnapshot, Simulation};
use blockfall::input::{InputSource, PRESS_ONLY_REPEAT_GUARD_MS};
use blockfall::store::JsonFileStore;
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::Phase;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let best_file = cli.best_file();
    log::info!(
        "starting: seed {:?}, best score file {}, {} fps",
        cli.seed,
        best_file.display(),
        cli.fps
    );
    let store = JsonFileStore::open_or_empty(best_file);
    let sim = match cli.seed {
        Some(seed) => Simulation::with_seed(store, seed),
        None => Simulation::new(store),
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, sim, Duration::from_millis(cli.frame_ms()));

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        log::error!("failed to restore terminal: {:#}", e);
    }
    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    result
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // The terminal is in raw alternate-screen mode, so logs only go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run<S: BestScoreStore>(
    term: &mut TerminalRenderer,
    mut sim: Simulation<S>,
    frame: Duration,
) -> Result<()> {
    let view = GameView::default();
    let mut input = InputSource::new();
    if !term.enhanced_keys() {
        // Auto-repeat arrives as presses; keep a held Space from firing
        // a hard drop per repeat.
        input = input.with_repeat_guard_ms(PRESS_ONLY_REPEAT_GUARD_MS);
    }
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let mut last_frame = Instant::now();
    // Sub-millisecond remainder carried into the next frame.
    let mut carry = Duration::ZERO;

    loop {
        // Input until the frame deadline.
        let deadline = last_frame + frame;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Resize(w, h) => {
                    log::debug!("terminal resized to {}x{}", w, h);
                    term.invalidate();
                }
                ev => input.handle_event(&ev),
            }
            if input.quit_requested() {
                log::info!("quit (score {}, best {})", sim.score(), sim.best());
                return Ok(());
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame) + carry;
        last_frame = now;
        let dt_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        carry = elapsed.saturating_sub(Duration::from_millis(u64::from(dt_ms)));

        input.tick(dt_ms);
        let intents = input.consume();

        if input.take_focus_lost() {
            sim.pause();
        }

        // `update` ignores everything once the game is over.
        if sim.phase() == Phase::Over && intents.restart {
            sim.restart();
        } else {
            sim.update(dt_ms, intents);
        }

        sim.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
