//! Key mapping from terminal events to simulated hand poses.
//!
//! The left hand uses the 3x3 block around `s`, laid out like the poses it
//! stands for; the right hand uses the digit row plus `u`/`j`.
//!
//! ```text
//!   q  w  e        top_left    top     top_right        1 2 3 4   counts
//!   a  s  d   ->   left        none    right            u         top
//!   z  x  c        bottom_left bottom  bottom_right     j         bottom
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GestureLabel;

/// One simulated hand pose change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimInput {
    Left(GestureLabel),
    Right(GestureLabel),
}

/// Map keyboard input to a hand pose.
pub fn handle_key_event(key: KeyEvent) -> Option<SimInput> {
    map_key_code(key.code)
}

pub fn map_key_code(code: KeyCode) -> Option<SimInput> {
    let KeyCode::Char(c) = code else {
        return None;
    };
    let input = match c.to_ascii_lowercase() {
        // Left hand: block selection
        'q' => SimInput::Left(GestureLabel::TopLeft),
        'w' => SimInput::Left(GestureLabel::Top),
        'e' => SimInput::Left(GestureLabel::TopRight),
        'a' => SimInput::Left(GestureLabel::Left),
        's' => SimInput::Left(GestureLabel::None),
        'd' => SimInput::Left(GestureLabel::Right),
        'z' => SimInput::Left(GestureLabel::BottomLeft),
        'x' => SimInput::Left(GestureLabel::Bottom),
        'c' => SimInput::Left(GestureLabel::BottomRight),

        // Right hand: character selection
        '1' => SimInput::Right(GestureLabel::One),
        '2' => SimInput::Right(GestureLabel::Two),
        '3' => SimInput::Right(GestureLabel::Three),
        '4' => SimInput::Right(GestureLabel::Four),
        'u' => SimInput::Right(GestureLabel::Top),
        'j' => SimInput::Right(GestureLabel::Bottom),

        _ => return None,
    };
    Some(input)
}

/// Check if key should quit the simulator.
///
/// Letters are all taken by poses, so only Esc and Ctrl-C quit.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
