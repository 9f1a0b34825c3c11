//! Game module - the per-frame pipeline and the game lifecycle
//!
//! [`Game`] owns every piece of mutable session state (debouncer, error
//! analysis, typing session) and is driven by exactly one caller: whoever
//! receives recognizer frames. Each frame runs to completion inside
//! [`Game::handle_frame`]:
//!
//! ```text
//! pair ──decode──▶ key ──debounce──▶ accepted? ──classify──▶ type_key
//! ```
//!
//! and the notifications for the display are returned to the caller instead
//! of being pushed through callbacks.

use arrayvec::ArrayVec;
use tracing::info;

use crate::analysis::{ErrorAnalysis, ErrorRecord, ErrorReport};
use crate::codebook::decode;
use crate::debounce::{DebounceConfig, Debouncer};
use crate::session::{MatchProgress, TypeOutcome, TypingSession, DEFAULT_SENTENCE};
use crate::types::{GameMode, GesturePair, Key};

/// Upper bound on notifications produced by a single frame.
pub const MAX_EVENTS_PER_FRAME: usize = 8;

/// Notification for the display side.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// First two-hand frame after the camera came up; the clock starts now.
    Started { target: Option<String> },
    /// A keystroke was accepted and applied to the buffer.
    KeyTyped {
        key: Key,
        buffer: String,
        progress: MatchProgress,
    },
    ErrorClassified(ErrorRecord),
    ReportUpdated(ErrorReport),
    SentenceCompleted { next: String },
    Finished { elapsed_ms: u64, report: ErrorReport },
}

pub type FrameEvents = ArrayVec<GameEvent, MAX_EVENTS_PER_FRAME>;

#[derive(Debug, Clone)]
pub struct Game {
    mode: GameMode,
    sentences: Vec<String>,
    session: TypingSession,
    debouncer: Debouncer,
    analysis: ErrorAnalysis,
    started_at_ms: u64,
    finished_at_ms: Option<u64>,
    last_pair: Option<GesturePair>,
}

impl Game {
    pub fn new<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(sentences, DebounceConfig::default())
    }

    pub fn with_config<I, S>(sentences: I, config: DebounceConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sentences: Vec<String> = sentences.into_iter().map(Into::into).collect();
        Self {
            mode: GameMode::NotReady,
            session: TypingSession::new(sentences.clone()),
            sentences,
            debouncer: Debouncer::with_config(config),
            analysis: ErrorAnalysis::new(),
            started_at_ms: 0,
            finished_at_ms: None,
            last_pair: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn analysis(&self) -> &ErrorAnalysis {
        &self.analysis
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn report(&self) -> ErrorReport {
        self.analysis.report()
    }

    /// Pose pair of the most recent two-hand frame.
    pub fn last_pair(&self) -> Option<GesturePair> {
        self.last_pair
    }

    /// Camera is streaming; wait for hands.
    ///
    /// Only meaningful before the first game; later calls are ignored.
    pub fn camera_ready(&mut self, now_ms: u64) -> bool {
        if self.mode != GameMode::NotReady {
            return false;
        }
        self.mode = GameMode::Ready;
        self.started_at_ms = now_ms;
        info!(target_sentence = ?self.session.current_target(), "camera ready");
        true
    }

    /// Start a fresh session at `start_ms`: refill the sentence queue, clear
    /// the buffer, the debouncer and the error analysis.
    pub fn reset_session(&mut self, start_ms: u64) {
        self.session = TypingSession::new(self.sentences.iter().cloned());
        self.debouncer.reset(start_ms);
        self.analysis.reset();
        self.started_at_ms = start_ms;
        self.finished_at_ms = None;
    }

    /// Play time so far (or total play time once finished).
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.mode {
            GameMode::Playing => now_ms.saturating_sub(self.started_at_ms),
            GameMode::Finished => self
                .finished_at_ms
                .unwrap_or(now_ms)
                .saturating_sub(self.started_at_ms),
            GameMode::NotReady | GameMode::Ready => 0,
        }
    }

    /// Process one two-hand frame.
    ///
    /// Frames with fewer than two hands must not reach this method; the
    /// caller drops them so the debouncer is left untouched.
    pub fn handle_frame(&mut self, pair: GesturePair, now_ms: u64) -> FrameEvents {
        let mut events = FrameEvents::new();

        match self.mode {
            GameMode::NotReady | GameMode::Finished => return events,
            GameMode::Ready => {
                self.reset_session(now_ms);
                self.mode = GameMode::Playing;
                info!("game started");
                events.push(GameEvent::Started {
                    target: self.session.current_target().map(str::to_string),
                });
            }
            GameMode::Playing => {}
        }

        self.last_pair = Some(pair);

        let Some(key) = decode(pair) else {
            return events;
        };

        // Sampled before the keystroke lands in the buffer.
        let target = self.session.current_target_char();

        if !self.debouncer.observe(key, now_ms).is_accepted() {
            return events;
        }

        if key != Key::Backspace {
            if let Some(target) = target {
                if let Some(record) = self.analysis.classify(target, pair, key, now_ms) {
                    events.push(GameEvent::ErrorClassified(record));
                    events.push(GameEvent::ReportUpdated(self.analysis.report()));
                }
            }
        }

        let outcome = self.session.type_key(key);
        events.push(GameEvent::KeyTyped {
            key,
            buffer: self.session.buffer().to_string(),
            progress: self.session.progress(),
        });

        match outcome {
            TypeOutcome::Typed => {}
            TypeOutcome::SentenceCompleted { next } => {
                events.push(GameEvent::SentenceCompleted { next });
            }
            TypeOutcome::Finished => {
                self.mode = GameMode::Finished;
                self.finished_at_ms = Some(now_ms);
                let elapsed_ms = self.elapsed_ms(now_ms);
                let report = self.analysis.report();
                info!(
                    elapsed_ms,
                    attempts = report.total_attempts,
                    "game finished in {:.2}s",
                    elapsed_ms as f64 / 1000.0
                );
                events.push(GameEvent::Finished { elapsed_ms, report });
            }
        }

        events
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new([DEFAULT_SENTENCE])
    }
}
