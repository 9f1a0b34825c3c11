//! Recognizer frames and their normalization into a [`GesturePair`].
//!
//! A recognizer reports up to two hands per camera frame, in whatever order
//! it detected them. Only frames with exactly two hands and two known labels
//! reach the game.

use serde::{Deserialize, Serialize};

use crate::types::{GestureLabel, GesturePair, Handedness, HANDS_PER_FRAME};

/// One detected hand, as reported on the wire.
///
/// Labels stay raw strings here: an unknown label drops the frame instead of
/// failing the whole message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: String,
    pub gesture: String,
    #[serde(default)]
    pub score: f32,
}

impl HandObservation {
    pub fn new(handedness: Handedness, gesture: GestureLabel) -> Self {
        Self {
            handedness: handedness.as_str().to_string(),
            gesture: gesture.as_str().to_string(),
            score: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl HandFrame {
    pub fn new(hands: Vec<HandObservation>) -> Self {
        Self { hands }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}

/// Order the two hands of a frame as (left, right).
///
/// Returns `None` unless exactly two hands are present and both gesture
/// labels are known. If the first hand is labelled `"Left"` it supplies the
/// left pose; otherwise the second hand does.
pub fn gesture_pair(frame: &HandFrame) -> Option<GesturePair> {
    if frame.hands.len() != HANDS_PER_FRAME {
        return None;
    }
    let (first, second) = (&frame.hands[0], &frame.hands[1]);

    let a = GestureLabel::from_str(&first.gesture)?;
    let b = GestureLabel::from_str(&second.gesture)?;

    if Handedness::from_str(&first.handedness) == Some(Handedness::Left) {
        Some(GesturePair::new(a, b))
    } else {
        Some(GesturePair::new(b, a))
    }
}
