//! Gesture input module (recognizer-facing).
//!
//! This crate is independent of any camera or model. It normalizes recognizer
//! frames into a [`crate::types::GesturePair`] and provides a keyboard
//! simulator that produces the same pairs from a terminal, for playing and
//! testing without a camera.

pub mod frame;
pub mod map;
pub mod sim;

pub use gesture_typer_types as types;

pub use frame::{gesture_pair, HandFrame, HandObservation};
pub use map::{handle_key_event, map_key_code, should_quit, SimInput};
pub use sim::GestureSimulator;
