//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the gesture typer.
//! All types are plain data with no game logic attached, so they can be used by
//! the decoding core, the recognizer-facing input layer and the TCP adapter.
//!
//! # Gesture Alphabet
//!
//! The external recognizer labels each hand with one of thirteen poses:
//!
//! - **Block poses** (left hand picks a letter block): `top`, `top_right`,
//!   `top_left`, `bottom`, `bottom_right`, `bottom_left`, `left`, `right`
//! - **Count poses** (right hand picks a letter inside the block): `one`,
//!   `two`, `three`, `four`
//! - **`none`**: the recognizer saw a hand but no known pose. It doubles as
//!   the left-hand selector for the `JKL` block.
//!
//! # Timing Constants
//!
//! Dwell thresholds are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `KEY_THRESHOLD_MS` | 700 | Minimum gap before a new letter is accepted |
//! | `EDIT_THRESHOLD_MS` | 780 | Minimum gap for space / backspace (and backspace repeat) |
//! | `LETTER_REPEAT_MS` | 1500 | Hold time before a held letter repeats |
//!
//! # Examples
//!
//! ```
//! use gesture_typer_types::{GestureLabel, GesturePair, Key};
//!
//! let pair = GesturePair::new(GestureLabel::Top, GestureLabel::One);
//! assert_eq!(pair.to_string(), "top_one");
//!
//! assert_eq!(GestureLabel::from_str("bottom_right"), Some(GestureLabel::BottomRight));
//! assert_eq!(GestureLabel::from_str("Thumb_Up"), None);
//!
//! assert_eq!(Key::from_char(' '), Key::Space);
//! assert_eq!(Key::Backspace.to_string(), "backspace");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum gap before a new letter is accepted (700ms).
pub const KEY_THRESHOLD_MS: u64 = 700;

/// Minimum gap before space or backspace is accepted (780ms).
///
/// Also the repeat interval of a held backspace.
pub const EDIT_THRESHOLD_MS: u64 = 780;

/// Hold time before the same letter is accepted again (1500ms).
pub const LETTER_REPEAT_MS: u64 = 1500;

/// Number of hands a frame must contain to be decoded.
pub const HANDS_PER_FRAME: usize = 2;

/// A discrete hand pose reported by the external recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    Top,
    TopRight,
    TopLeft,
    Bottom,
    BottomRight,
    BottomLeft,
    Left,
    Right,
    One,
    Two,
    Three,
    Four,
    None,
}

impl GestureLabel {
    /// Every pose, block poses first.
    pub const ALL: [GestureLabel; 13] = [
        GestureLabel::Top,
        GestureLabel::TopRight,
        GestureLabel::TopLeft,
        GestureLabel::Bottom,
        GestureLabel::BottomRight,
        GestureLabel::BottomLeft,
        GestureLabel::Left,
        GestureLabel::Right,
        GestureLabel::One,
        GestureLabel::Two,
        GestureLabel::Three,
        GestureLabel::Four,
        GestureLabel::None,
    ];

    /// Parse a recognizer label.
    ///
    /// Labels must match exactly; anything else is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use gesture_typer_types::GestureLabel;
    ///
    /// assert_eq!(GestureLabel::from_str("top_left"), Some(GestureLabel::TopLeft));
    /// assert_eq!(GestureLabel::from_str("four"), Some(GestureLabel::Four));
    /// assert_eq!(GestureLabel::from_str("FOUR"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "top" => Some(GestureLabel::Top),
            "top_right" => Some(GestureLabel::TopRight),
            "top_left" => Some(GestureLabel::TopLeft),
            "bottom" => Some(GestureLabel::Bottom),
            "bottom_right" => Some(GestureLabel::BottomRight),
            "bottom_left" => Some(GestureLabel::BottomLeft),
            "left" => Some(GestureLabel::Left),
            "right" => Some(GestureLabel::Right),
            "one" => Some(GestureLabel::One),
            "two" => Some(GestureLabel::Two),
            "three" => Some(GestureLabel::Three),
            "four" => Some(GestureLabel::Four),
            "none" => Some(GestureLabel::None),
            _ => None,
        }
    }

    /// Recognizer wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::Top => "top",
            GestureLabel::TopRight => "top_right",
            GestureLabel::TopLeft => "top_left",
            GestureLabel::Bottom => "bottom",
            GestureLabel::BottomRight => "bottom_right",
            GestureLabel::BottomLeft => "bottom_left",
            GestureLabel::Left => "left",
            GestureLabel::Right => "right",
            GestureLabel::One => "one",
            GestureLabel::Two => "two",
            GestureLabel::Three => "three",
            GestureLabel::Four => "four",
            GestureLabel::None => "none",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anatomical hand reported by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse the recognizer's category name (`"Left"` / `"Right"`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Left" => Some(Handedness::Left),
            "Right" => Some(Handedness::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// One frame's poses, already ordered as (anatomical left, anatomical right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GesturePair {
    pub left: GestureLabel,
    pub right: GestureLabel,
}

impl GesturePair {
    pub const fn new(left: GestureLabel, right: GestureLabel) -> Self {
        Self { left, right }
    }
}

/// Renders the composite code (`left_right`) shown in diagnostics.
impl fmt::Display for GesturePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.left, self.right)
    }
}

/// A decoded keystroke.
///
/// Decoding can also yield nothing (an unmapped pair); that is expressed as
/// `Option<Key>` rather than a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character other than space.
    Letter(char),
    Space,
    Backspace,
}

impl Key {
    /// Key that types `c`.
    pub fn from_char(c: char) -> Self {
        if c == ' ' {
            Key::Space
        } else {
            Key::Letter(c)
        }
    }

    /// Character appended to the input buffer, `None` for backspace.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Letter(c) => Some(*c),
            Key::Space => Some(' '),
            Key::Backspace => None,
        }
    }

    /// Whether typing this key produces exactly `c`.
    pub fn matches_char(&self, c: char) -> bool {
        self.as_char() == Some(c)
    }
}

/// Display form: the letter, `" "` or `"backspace"`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "{c}"),
            Key::Space => f.write_str(" "),
            Key::Backspace => f.write_str("backspace"),
        }
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Which part of a two-handed chord went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Left hand chose the wrong block.
    BlockSelection,
    /// Left hand was right, right-hand count was wrong.
    CharacterSelection,
    /// Both hands wrong at once.
    ///
    /// Never produced today: a left mismatch is always reported as
    /// `BlockSelection` first. The counter is kept so reports stay stable.
    Coordination,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BlockSelection => "block_selection",
            ErrorKind::CharacterSelection => "character_selection",
            ErrorKind::Coordination => "coordination",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game lifecycle
///
/// `NotReady → Ready → Playing → Finished`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Camera not started yet.
    NotReady,
    /// Camera running, waiting for the first two-hand frame.
    Ready,
    Playing,
    Finished,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::NotReady => "not_ready",
            GameMode::Ready => "ready",
            GameMode::Playing => "playing",
            GameMode::Finished => "finished",
        }
    }
}
