//! Terminal Fliptris runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for input and the framebuffer-based renderer from the term crate.
//! `--replay` runs a recorded input script headless and prints the final score.

mod scores;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_fliptris::core::{GameSnapshot, GameState, ModeSettings, RulesConfig};
use tui_fliptris::engine::{Engine, InputScript, NoAudio};
use tui_fliptris::input::{should_quit, should_restart, KeyboardInput};
use tui_fliptris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_fliptris::types::{GameMode, TICK_MS};

use scores::JsonLinesStore;

#[derive(Debug, Parser)]
#[command(name = "tui-fliptris")]
#[command(about = "Split-field falling blocks: flip the board, jam the stack")]
struct Cli {
    /// marathon, chillax, garbage, redemption, coop or sirtet
    #[arg(long, default_value = "marathon", value_parser = parse_mode)]
    mode: GameMode,
    #[arg(long, default_value_t = 0)]
    level: u32,
    /// Garbage mode height setting (1-5)
    #[arg(long, default_value_t = 1)]
    garbage_height: u8,
    /// Redemption lives (1-9)
    #[arg(long, default_value_t = 3)]
    lives: u8,
    /// Randomizer seed; defaults to the clock
    #[arg(long)]
    seed: Option<u32>,
    /// JSON file overriding lock and timing rules
    #[arg(long)]
    rules: Option<PathBuf>,
    #[arg(long, default_value = "fliptris-scores.jsonl")]
    scores: PathBuf,
    /// Save the run's input script here on exit
    #[arg(long)]
    record: Option<PathBuf>,
    /// Replay an input script headless instead of playing
    #[arg(long, conflicts_with = "record")]
    replay: Option<PathBuf>,
    /// Log file, written only when RUST_LOG is set
    #[arg(long, default_value = "fliptris.log")]
    log_file: PathBuf,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    GameMode::from_str(s).ok_or_else(|| format!("unknown mode `{s}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if let Some(path) = &cli.replay {
        return replay(path);
    }

    let config = match &cli.rules {
        Some(path) => RulesConfig::load(path)?,
        None => RulesConfig::default(),
    };
    let mut settings = ModeSettings::new(cli.mode);
    settings.set_starting_level(cli.level);
    settings.set_garbage_height(cli.garbage_height);
    settings.set_lives(cli.lives);
    let seed = cli.seed.unwrap_or_else(clock_seed);

    let state = GameState::with_settings(seed, settings, config);
    let store = JsonLinesStore::new(&cli.scores);
    let mut engine = Engine::new(state, NoAudio, store);
    if cli.record.is_some() {
        engine.start_recording();
    }
    info!(mode = cli.mode.as_str(), seed, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &mut engine);
    // Always try to restore terminal state.
    let _ = term.exit();
    result?;

    if let (Some(path), Some(script)) = (&cli.record, engine.take_recording()) {
        script.save(path)?;
        println!("recorded {} frames to {}", script.len(), path.display());
    }

    let (_, _, store) = engine.into_parts();
    let top = store.top(cli.mode, 5)?;
    if !top.is_empty() {
        println!("best {} runs:", cli.mode.as_str());
        for (i, entry) in top.iter().enumerate() {
            println!(
                "{:>2}. {:>8}  lines {:>4}  {:>4}s{}",
                i + 1,
                entry.score,
                entry.lines,
                entry.elapsed_ms / 1000,
                if entry.won { "  cleared" } else { "" }
            );
        }
    }
    Ok(())
}

fn run(term: &mut TerminalRenderer, engine: &mut Engine<NoAudio, JsonLinesStore>) -> Result<()> {
    let view = GameView::default();
    let mut keyboard = KeyboardInput::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        engine.state().snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if should_restart(key) {
                            engine.restart();
                            keyboard.reset();
                            continue;
                        }
                        keyboard.handle_key_press(key.code);
                    }
                    // DAS/ARR handles repeats.
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => keyboard.handle_key_release(key.code),
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            keyboard.release_stale();
            engine.frame(&mut keyboard, TICK_MS);
        }
    }
}

fn replay(path: &Path) -> Result<()> {
    let script = InputScript::load(path)?;
    if script.is_empty() {
        bail!("{} holds no frames", path.display());
    }
    let state = script.replay();
    let summary = state.score_state();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = File::create(&cli.log_file)
        .with_context(|| format!("creating {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}
