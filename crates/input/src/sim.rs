//! Keyboard stand-in for the camera recognizer.
//!
//! Each hand holds the last pose pressed for it. Terminals rarely report key
//! releases and never auto-repeat two keys at once, so a pose stays latched
//! until its key-release timeout passes without another press for that hand.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::map::{map_key_code, SimInput};
use crate::types::{GestureLabel, GesturePair};

#[derive(Debug, Clone, Copy)]
struct HeldPose {
    label: GestureLabel,
    pressed_at: Instant,
}

/// Tracks both simulated hands.
#[derive(Debug, Clone)]
pub struct GestureSimulator {
    left: Option<HeldPose>,
    right: Option<HeldPose>,
    key_release_timeout_ms: u32,
}

// Long enough to press the second hand's key and clear the letter dwell.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 1_200;

impl GestureSimulator {
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn left(&self) -> Option<GestureLabel> {
        self.left.map(|p| p.label)
    }

    pub fn right(&self) -> Option<GestureLabel> {
        self.right.map(|p| p.label)
    }

    /// Apply a pose change. Returns false when the input was already held.
    pub fn press(&mut self, input: SimInput) -> bool {
        let (slot, label) = match input {
            SimInput::Left(label) => (&mut self.left, label),
            SimInput::Right(label) => (&mut self.right, label),
        };
        let changed = slot.map(|p| p.label) != Some(label);
        *slot = Some(HeldPose {
            label,
            pressed_at: Instant::now(),
        });
        changed
    }

    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<SimInput> {
        let input = map_key_code(code)?;
        self.press(input);
        Some(input)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        match map_key_code(code) {
            Some(SimInput::Left(label)) if self.left() == Some(label) => self.left = None,
            Some(SimInput::Right(label)) if self.right() == Some(label) => self.right = None,
            _ => {}
        }
    }

    /// Release poses whose timeout has passed.
    pub fn update(&mut self) {
        let timeout = Duration::from_millis(u64::from(self.key_release_timeout_ms));
        for slot in [&mut self.left, &mut self.right] {
            if slot.is_some_and(|p| p.pressed_at.elapsed() > timeout) {
                *slot = None;
            }
        }
    }

    /// Current two-hand frame, if both hands are posed.
    pub fn frame(&self) -> Option<GesturePair> {
        Some(GesturePair::new(self.left()?, self.right()?))
    }

    pub fn reset(&mut self) {
        self.left = None;
        self.right = None;
    }
}

impl Default for GestureSimulator {
    fn default() -> Self {
        Self::new()
    }
}
