//! Gesture Typer (workspace facade crate).
//!
//! This package exposes `gesture_typer::{adapter,core,input,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use gesture_typer_adapter as adapter;
pub use gesture_typer_core as core;
pub use gesture_typer_input as input;
pub use gesture_typer_types as types;
