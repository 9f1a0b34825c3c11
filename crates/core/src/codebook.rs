//! Codebook - the chord table that maps gesture pairs to keys
//!
//! Letters are laid out in phone-keypad style blocks. The left hand picks a
//! block with a directional pose and the right hand picks a letter inside the
//! block with a finger count:
//!
//! | Left pose | one | two | three | four |
//! |-----------|-----|-----|-------|------|
//! | `top` | a | b | c | |
//! | `top_right` | d | e | f | |
//! | `left` | g | h | i | |
//! | `none` | j | k | l | |
//! | `right` | m | n | o | |
//! | `bottom_left` | p | q | r | s |
//! | `bottom` | t | u | v | |
//! | `bottom_right` | w | x | y | z |
//!
//! Space is `top` on both hands and backspace is `bottom` on both hands.
//!
//! Both directions of the mapping read the same [`CODEBOOK`] table, so every
//! key that [`expected_gestures`] knows about decodes back to itself.

use crate::types::{GestureLabel, GesturePair, Key};

use crate::types::GestureLabel::{
    Bottom, BottomLeft, BottomRight, Four, Left, None as NoPose, One, Right, Three, Top, TopRight,
    Two,
};

/// One chord: the pose pair and the key it types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub pair: GesturePair,
    pub key: Key,
}

const fn chord(left: GestureLabel, right: GestureLabel, key: Key) -> Chord {
    Chord {
        pair: GesturePair::new(left, right),
        key,
    }
}

/// The full chord table.
pub const CODEBOOK: [Chord; 28] = [
    chord(Bottom, Bottom, Key::Backspace),
    chord(Top, One, Key::Letter('a')),
    chord(Top, Two, Key::Letter('b')),
    chord(Top, Three, Key::Letter('c')),
    chord(TopRight, One, Key::Letter('d')),
    chord(TopRight, Two, Key::Letter('e')),
    chord(TopRight, Three, Key::Letter('f')),
    chord(Left, One, Key::Letter('g')),
    chord(Left, Two, Key::Letter('h')),
    chord(Left, Three, Key::Letter('i')),
    chord(NoPose, One, Key::Letter('j')),
    chord(NoPose, Two, Key::Letter('k')),
    chord(NoPose, Three, Key::Letter('l')),
    chord(Right, One, Key::Letter('m')),
    chord(Right, Two, Key::Letter('n')),
    chord(Right, Three, Key::Letter('o')),
    chord(BottomLeft, One, Key::Letter('p')),
    chord(BottomLeft, Two, Key::Letter('q')),
    chord(BottomLeft, Three, Key::Letter('r')),
    chord(BottomLeft, Four, Key::Letter('s')),
    chord(Bottom, One, Key::Letter('t')),
    chord(Bottom, Two, Key::Letter('u')),
    chord(Bottom, Three, Key::Letter('v')),
    chord(BottomRight, One, Key::Letter('w')),
    chord(BottomRight, Two, Key::Letter('x')),
    chord(BottomRight, Three, Key::Letter('y')),
    chord(BottomRight, Four, Key::Letter('z')),
    chord(Top, Top, Key::Space),
];

/// Decode a gesture pair into a key.
///
/// Order-sensitive: `(left, right)` and `(right, left)` are different chords.
/// Returns `None` for pairs that are not in the table.
///
/// # Examples
///
/// ```
/// use gesture_typer_core::codebook::decode;
/// use gesture_typer_core::types::{GestureLabel, GesturePair, Key};
///
/// let pair = GesturePair::new(GestureLabel::BottomLeft, GestureLabel::Four);
/// assert_eq!(decode(pair), Some(Key::Letter('s')));
///
/// let unmapped = GesturePair::new(GestureLabel::Top, GestureLabel::Four);
/// assert_eq!(decode(unmapped), None);
/// ```
pub fn decode(pair: GesturePair) -> Option<Key> {
    CODEBOOK.iter().find(|c| c.pair == pair).map(|c| c.key)
}

/// Gesture pair that types `key`, or `None` when no chord produces it.
pub fn expected_gestures(key: Key) -> Option<GesturePair> {
    CODEBOOK.iter().find(|c| c.key == key).map(|c| c.pair)
}

/// Gesture pair expected for a target character of a sentence.
pub fn expected_for_char(target: char) -> Option<GesturePair> {
    expected_gestures(Key::from_char(target))
}

/// First character of `text` that no chord can type.
pub fn first_untypable(text: &str) -> Option<char> {
    text.chars().find(|&c| expected_for_char(c).is_none())
}

/// Human-readable letter block a left-hand pose selects.
pub fn block_letters(left: GestureLabel) -> &'static str {
    match left {
        Top => "ABC/DEF",
        TopRight => "DEF",
        Left => "GHI",
        NoPose => "JKL",
        Right => "MNO",
        BottomLeft => "PQRS",
        Bottom => "TUV/SPACE/BACKSPACE",
        BottomRight => "WXYZ",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GestureLabel;

    #[test]
    fn every_letter_round_trips() {
        for c in 'a'..='z' {
            let pair = expected_for_char(c).unwrap_or_else(|| panic!("no chord for {c}"));
            assert_eq!(decode(pair), Some(Key::Letter(c)), "{c} via {pair}");
        }
    }

    #[test]
    fn space_and_backspace_chords() {
        assert_eq!(decode(GesturePair::new(Top, Top)), Some(Key::Space));
        assert_eq!(decode(GesturePair::new(Bottom, Bottom)), Some(Key::Backspace));
        assert_eq!(expected_gestures(Key::Space), Some(GesturePair::new(Top, Top)));
        assert_eq!(
            expected_gestures(Key::Backspace),
            Some(GesturePair::new(Bottom, Bottom))
        );
    }

    #[test]
    fn unmapped_pairs_decode_to_nothing() {
        assert_eq!(decode(GesturePair::new(Top, Four)), None);
        assert_eq!(decode(GesturePair::new(GestureLabel::TopLeft, One)), None);
        assert_eq!(decode(GesturePair::new(NoPose, NoPose)), None);
    }

    #[test]
    fn decoding_is_order_sensitive() {
        assert_eq!(decode(GesturePair::new(Top, One)), Some(Key::Letter('a')));
        assert_eq!(decode(GesturePair::new(One, Top)), None);
    }

    #[test]
    fn unknown_target_characters_have_no_chord() {
        assert_eq!(expected_for_char('A'), None);
        assert_eq!(expected_for_char('.'), None);
        assert_eq!(expected_for_char('1'), None);
    }

    #[test]
    fn untypable_characters_are_reported() {
        assert_eq!(first_untypable("the quick brown fox"), None);
        assert_eq!(first_untypable("hello, world"), Some(','));
        assert_eq!(first_untypable("Hi"), Some('H'));
        assert_eq!(first_untypable(""), None);
    }

    #[test]
    fn chord_table_has_no_duplicates() {
        for (i, a) in CODEBOOK.iter().enumerate() {
            for b in &CODEBOOK[i + 1..] {
                assert_ne!(a.pair, b.pair, "duplicate pair {}", a.pair);
                assert_ne!(a.key, b.key, "duplicate key {}", a.key);
            }
        }
    }

    #[test]
    fn block_names_follow_left_pose() {
        assert_eq!(block_letters(BottomLeft), "PQRS");
        assert_eq!(block_letters(NoPose), "JKL");
        assert_eq!(block_letters(One), "unknown");
        assert_eq!(block_letters(GestureLabel::TopLeft), "unknown");
    }
}
