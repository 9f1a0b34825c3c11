//! Gesture typer runner (default binary).
//!
//! `serve` drives the game from an external recognizer over the TCP adapter;
//! `sim` plays it in the terminal with the keyboard standing in for the camera.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gesture_typer::adapter::{apply_inbound, Adapter};
use gesture_typer::core::{
    block_letters, first_untypable, DebounceConfig, ErrorReport, Game, GameEvent,
    DEFAULT_SENTENCE,
};
use gesture_typer::input::{should_quit, GestureSimulator};
use gesture_typer::types::GameMode;

/// Simulator frame interval, roughly a 30 fps camera.
const SIM_FRAME_MS: u64 = 33;

#[derive(Parser, Debug)]
#[command(name = "gesture-typer", version, about = "Two-handed gesture typing game")]
struct Cli {
    /// File with one target sentence per line
    #[arg(long, global = true)]
    sentences: Option<PathBuf>,

    /// Dwell before a new letter is accepted (ms)
    #[arg(long, global = true)]
    key_threshold_ms: Option<u64>,

    /// Dwell before space or backspace is accepted, and the backspace repeat (ms)
    #[arg(long, global = true)]
    edit_threshold_ms: Option<u64>,

    /// Hold time before a letter repeats (ms)
    #[arg(long, global = true)]
    letter_repeat_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Accept recognizer frames over TCP (see GESTURE_TYPER_* variables)
    Serve,
    /// Play in the terminal with the keyboard simulator (default)
    Sim,
}

impl Cli {
    fn debounce_config(&self) -> DebounceConfig {
        let mut config = DebounceConfig::default();
        if let Some(ms) = self.key_threshold_ms {
            config.key_threshold_ms = ms;
        }
        if let Some(ms) = self.edit_threshold_ms {
            config.edit_threshold_ms = ms;
        }
        if let Some(ms) = self.letter_repeat_ms {
            config.letter_repeat_ms = ms;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Sim);

    // The simulator owns the terminal; keep it quiet unless asked.
    let default_filter = match command {
        Command::Serve => "gesture_typer=info,gesture_typer_core=info,gesture_typer_adapter=info",
        Command::Sim => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let sentences = match &cli.sentences {
        Some(path) => load_sentences(path)?,
        None => vec![DEFAULT_SENTENCE.to_string()],
    };
    let game = Game::with_config(sentences, cli.debounce_config());

    match command {
        Command::Serve => serve(game),
        Command::Sim => sim(game),
    }
}

/// One target per non-empty line, lowercased.
fn load_sentences(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sentences from {}", path.display()))?;
    let sentences = parse_sentences(&text)
        .with_context(|| format!("invalid sentences in {}", path.display()))?;
    if sentences.is_empty() {
        bail!("no sentences in {}", path.display());
    }
    Ok(sentences)
}

fn parse_sentences(text: &str) -> Result<Vec<String>> {
    let mut sentences = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let sentence = line.trim().to_lowercase();
        if sentence.is_empty() {
            continue;
        }
        if let Some(c) = first_untypable(&sentence) {
            bail!("line {}: {c:?} cannot be typed with gestures", lineno + 1);
        }
        sentences.push(sentence);
    }
    Ok(sentences)
}

fn print_summary(elapsed_ms: u64, report: &ErrorReport) {
    println!("Finished in {:.2} seconds", elapsed_ms as f64 / 1000.0);
    for line in report.summary_lines() {
        println!("{line}");
    }
}

fn serve(mut game: Game) -> Result<()> {
    let Some(mut adapter) = Adapter::start_from_env()? else {
        info!("adapter disabled via GESTURE_TYPER_DISABLED");
        return Ok(());
    };

    // Frames are timed at receipt; recognizer clocks may restart or disagree.
    while let Some(cmd) = adapter.recv_blocking() {
        let events = apply_inbound(&mut game, &cmd.payload, cmd.received_ms);
        adapter.publish(&events);
        if let Some(GameEvent::Finished { elapsed_ms, report }) = events.last() {
            print_summary(*elapsed_ms, report);
        }
    }
    Ok(())
}

fn sim(mut game: Game) -> Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run_sim(&mut game, &mut stdout);

    // Always try to restore terminal state.
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Some((elapsed_ms, report)) = result? {
        print_summary(elapsed_ms, &report);
    }
    Ok(())
}

fn run_sim(game: &mut Game, out: &mut impl Write) -> Result<Option<(u64, ErrorReport)>> {
    let clock = Instant::now();
    let frame_interval = Duration::from_millis(SIM_FRAME_MS);
    let mut sim = GestureSimulator::new();

    game.camera_ready(0);

    loop {
        if event::poll(frame_interval)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(None);
                        }
                        sim.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => sim.handle_key_release(key.code),
                }
            }
        }

        sim.update();
        let now_ms = clock.elapsed().as_millis() as u64;
        if let Some(pair) = sim.frame() {
            for event in game.handle_frame(pair, now_ms) {
                if let GameEvent::Finished { elapsed_ms, report } = event {
                    return Ok(Some((elapsed_ms, report)));
                }
            }
        }

        draw(out, game, &sim, now_ms)?;
    }
}

fn draw(out: &mut impl Write, game: &Game, sim: &GestureSimulator, now_ms: u64) -> Result<()> {
    let session = game.session();
    let progress = session.progress();
    let report = game.report();

    let left = sim
        .left()
        .map(|l| format!("{l} [{}]", block_letters(l)))
        .unwrap_or_else(|| "-".to_string());
    let right = sim.right().map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
    let status = match game.mode() {
        GameMode::Ready => "show both hands to start".to_string(),
        _ => format!("{:.1}s", game.elapsed_ms(now_ms) as f64 / 1000.0),
    };

    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    queue!(
        out,
        Print(format!("Target: {}", session.current_target().unwrap_or(""))),
        MoveToNextLine(1),
    )?;
    if progress.mismatch {
        queue!(out, SetForegroundColor(Color::Red))?;
    }
    queue!(
        out,
        Print(format!("Typed:  {}", session.buffer())),
        ResetColor,
        MoveToNextLine(2),
        Print(format!("Left: {left}   Right: {right}   {status}")),
        MoveToNextLine(1),
        Print(format!(
            "Errors: {} (block {}, character {})",
            report.total_attempts, report.block_selection_errors, report.character_selection_errors
        )),
        MoveToNextLine(2),
        Print("qweasdzxc: left hand   1234uj: right hand   Esc: quit"),
    )?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentences_lowercases_and_skips_blank_lines() {
        let sentences = parse_sentences("Hello World\n\n  abc  \n").unwrap();
        assert_eq!(sentences, vec!["hello world", "abc"]);
    }

    #[test]
    fn test_parse_sentences_rejects_untypable_characters() {
        let err = parse_sentences("ok\nno digits 4 u\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("'4'"), "{msg}");
    }
}
