//! Core gesture-typing logic - pure, deterministic, and testable
//!
//! This crate turns a stream of two-hand gesture observations into typed text
//! and attributes typing mistakes to the hand that made them. It has **no
//! dependencies** on cameras, networking or rendering:
//!
//! - **Deterministic**: every operation takes the current time as an argument
//! - **Testable**: each state transition is reachable from a unit test
//! - **Single-owner**: all mutable state lives in one [`Game`] value
//!
//! # Module Structure
//!
//! - [`codebook`]: chord table, decoding and the expected chord for a target
//! - [`debounce`]: dwell/repeat thresholds that turn frames into keystrokes
//! - [`analysis`]: block/character error classification and the error report
//! - [`session`]: sentence queue, input buffer and typed-prefix progress
//! - [`game`]: lifecycle (`NotReady → Ready → Playing → Finished`) and the
//!   per-frame pipeline
//!
//! # Example
//!
//! ```
//! use gesture_typer_core::{Game, GameEvent};
//! use gesture_typer_core::types::{GestureLabel, GesturePair};
//!
//! let mut game = Game::new(["hi"]);
//! game.camera_ready(0);
//!
//! // The first two-hand frame starts the clock.
//! let h = GesturePair::new(GestureLabel::Left, GestureLabel::Two);
//! let i = GesturePair::new(GestureLabel::Left, GestureLabel::Three);
//! game.handle_frame(h, 0);
//!
//! game.handle_frame(h, 800);
//! let events = game.handle_frame(i, 1_600);
//! assert!(matches!(events.last(), Some(GameEvent::Finished { .. })));
//! ```
//!
//! # Timing
//!
//! Times are plain `u64` milliseconds from any monotonic clock. The caller
//! picks the clock; the core only ever subtracts timestamps.

pub mod analysis;
pub mod codebook;
pub mod debounce;
pub mod game;
pub mod session;

pub use gesture_typer_types as types;

// Re-export commonly used types for convenience
pub use analysis::{ErrorAnalysis, ErrorCounters, ErrorRecord, ErrorReport};
pub use codebook::{block_letters, decode, expected_for_char, expected_gestures, first_untypable};
pub use debounce::{DebounceConfig, Debouncer, RejectReason, Verdict};
pub use game::{FrameEvents, Game, GameEvent};
pub use session::{MatchProgress, TypeOutcome, TypingSession, DEFAULT_SENTENCE};
