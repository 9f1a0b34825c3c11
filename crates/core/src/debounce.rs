//! Dwell/repeat debouncer for decoded keys.
//!
//! The recognizer reports a pose pair on every camera frame, so a held chord
//! decodes to the same key dozens of times per second. The debouncer turns
//! that stream into discrete keystrokes:
//!
//! - A key different from the last accepted one needs `key_threshold_ms`
//!   (letters) or `edit_threshold_ms` (space, backspace) since the last
//!   acceptance.
//! - A held backspace repeats every `edit_threshold_ms`.
//! - A held space never repeats; the chord has to change first.
//! - A held letter repeats only after `letter_repeat_ms`.
//!
//! Rejected keys never become the new baseline.

use tracing::debug;

use crate::types::{Key, EDIT_THRESHOLD_MS, KEY_THRESHOLD_MS, LETTER_REPEAT_MS};

/// Dwell thresholds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub key_threshold_ms: u64,
    pub edit_threshold_ms: u64,
    pub letter_repeat_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            key_threshold_ms: KEY_THRESHOLD_MS,
            edit_threshold_ms: EDIT_THRESHOLD_MS,
            letter_repeat_ms: LETTER_REPEAT_MS,
        }
    }
}

impl DebounceConfig {
    /// Threshold a key must clear when it differs from the last accepted key.
    pub fn threshold_for(&self, key: Key) -> u64 {
        match key {
            Key::Space | Key::Backspace => self.edit_threshold_ms,
            Key::Letter(_) => self.key_threshold_ms,
        }
    }
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A new key arrived before its threshold elapsed.
    TooSoon,
    /// The same key is still held and its repeat interval has not elapsed.
    RepeatTooSoon,
    /// Space is held; it never auto-repeats.
    SpaceHeld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    config: DebounceConfig,
    last_key: Option<Key>,
    last_accepted_ms: u64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with_config(DebounceConfig::default())
    }

    pub fn with_config(config: DebounceConfig) -> Self {
        Self {
            config,
            last_key: None,
            last_accepted_ms: 0,
        }
    }

    pub fn config(&self) -> DebounceConfig {
        self.config
    }

    pub fn last_key(&self) -> Option<Key> {
        self.last_key
    }

    pub fn last_accepted_ms(&self) -> u64 {
        self.last_accepted_ms
    }

    /// Forget the last key and restart the clock at `start_ms`.
    pub fn reset(&mut self, start_ms: u64) {
        self.last_key = None;
        self.last_accepted_ms = start_ms;
    }

    /// Decide whether `candidate`, seen at `now_ms`, is a keystroke.
    ///
    /// On acceptance the candidate becomes the new baseline.
    pub fn observe(&mut self, candidate: Key, now_ms: u64) -> Verdict {
        // A clock that steps backwards reads as zero elapsed, never as a wrap.
        let elapsed = now_ms.saturating_sub(self.last_accepted_ms);

        let verdict = if self.last_key == Some(candidate) {
            match candidate {
                Key::Backspace => {
                    if elapsed > self.config.edit_threshold_ms {
                        Verdict::Accepted
                    } else {
                        Verdict::Rejected(RejectReason::RepeatTooSoon)
                    }
                }
                Key::Space => Verdict::Rejected(RejectReason::SpaceHeld),
                Key::Letter(_) => {
                    if elapsed > self.config.letter_repeat_ms {
                        Verdict::Accepted
                    } else {
                        Verdict::Rejected(RejectReason::RepeatTooSoon)
                    }
                }
            }
        } else if elapsed > self.config.threshold_for(candidate) {
            Verdict::Accepted
        } else {
            Verdict::Rejected(RejectReason::TooSoon)
        };

        match verdict {
            Verdict::Accepted => {
                self.last_key = Some(candidate);
                self.last_accepted_ms = now_ms;
            }
            Verdict::Rejected(reason) => {
                debug!(key = %candidate, elapsed, ?reason, "candidate rejected");
            }
        }

        verdict
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primed(key: Key, at_ms: u64) -> Debouncer {
        let mut d = Debouncer::new();
        d.reset(0);
        d.last_key = Some(key);
        d.last_accepted_ms = at_ms;
        d
    }

    #[test]
    fn test_first_key_waits_for_threshold_after_reset() {
        let mut d = Debouncer::new();
        d.reset(1_000);

        assert_eq!(
            d.observe(Key::Letter('a'), 1_700),
            Verdict::Rejected(RejectReason::TooSoon)
        );
        assert_eq!(d.last_key(), None);

        assert_eq!(d.observe(Key::Letter('a'), 1_701), Verdict::Accepted);
        assert_eq!(d.last_key(), Some(Key::Letter('a')));
        assert_eq!(d.last_accepted_ms(), 1_701);
    }

    #[test]
    fn test_held_letter_repeats_after_1500ms() {
        let mut d = primed(Key::Letter('a'), 10_000);

        assert_eq!(
            d.observe(Key::Letter('a'), 11_499),
            Verdict::Rejected(RejectReason::RepeatTooSoon)
        );
        assert_eq!(d.last_accepted_ms(), 10_000);

        // Exactly at the threshold is still too soon.
        assert!(!d.observe(Key::Letter('a'), 11_500).is_accepted());

        assert_eq!(d.observe(Key::Letter('a'), 11_501), Verdict::Accepted);
        assert_eq!(d.last_accepted_ms(), 11_501);
    }

    #[test]
    fn test_held_space_never_repeats() {
        let mut d = primed(Key::Space, 0);

        for now in [1, 780, 781, 1_501, 60_000, u64::MAX] {
            assert_eq!(
                d.observe(Key::Space, now),
                Verdict::Rejected(RejectReason::SpaceHeld)
            );
        }
        assert_eq!(d.last_accepted_ms(), 0);
    }

    #[test]
    fn test_held_backspace_repeats_every_780ms() {
        let mut d = primed(Key::Backspace, 5_000);

        assert_eq!(
            d.observe(Key::Backspace, 5_700),
            Verdict::Rejected(RejectReason::RepeatTooSoon)
        );
        assert_eq!(d.observe(Key::Backspace, 5_781), Verdict::Accepted);

        // The repeat restarts the interval.
        assert!(!d.observe(Key::Backspace, 6_500).is_accepted());
        assert!(d.observe(Key::Backspace, 6_562).is_accepted());
    }

    #[test]
    fn test_new_letter_needs_700ms() {
        let mut d = primed(Key::Letter('a'), 0);

        assert!(!d.observe(Key::Letter('b'), 700).is_accepted());
        assert!(d.observe(Key::Letter('b'), 701).is_accepted());
        assert_eq!(d.last_key(), Some(Key::Letter('b')));
    }

    #[test]
    fn test_space_and_backspace_need_780ms() {
        let mut d = primed(Key::Letter('a'), 0);
        assert!(!d.observe(Key::Space, 750).is_accepted());
        assert!(d.observe(Key::Space, 781).is_accepted());

        let mut d = primed(Key::Letter('a'), 0);
        assert!(!d.observe(Key::Backspace, 780).is_accepted());
        assert!(d.observe(Key::Backspace, 781).is_accepted());
    }

    #[test]
    fn test_rejected_candidate_does_not_become_baseline() {
        let mut d = primed(Key::Letter('a'), 0);

        // 'b' flickers in too early and is dropped...
        assert!(!d.observe(Key::Letter('b'), 300).is_accepted());
        assert_eq!(d.last_key(), Some(Key::Letter('a')));

        // ...so holding 'a' is still judged against the repeat interval.
        assert!(!d.observe(Key::Letter('a'), 1_000).is_accepted());
        assert!(d.observe(Key::Letter('b'), 1_000).is_accepted());
    }

    #[test]
    fn test_backwards_clock_reads_as_no_time_elapsed() {
        let mut d = primed(Key::Letter('a'), 10_000);
        assert!(!d.observe(Key::Letter('b'), 9_000).is_accepted());
        assert_eq!(d.last_accepted_ms(), 10_000);
    }

    #[test]
    fn test_custom_thresholds() {
        let mut d = Debouncer::with_config(DebounceConfig {
            key_threshold_ms: 100,
            edit_threshold_ms: 200,
            letter_repeat_ms: 300,
        });
        d.reset(0);

        assert!(d.observe(Key::Letter('x'), 101).is_accepted());
        assert!(!d.observe(Key::Letter('x'), 401).is_accepted());
        assert!(d.observe(Key::Letter('x'), 402).is_accepted());
        assert!(!d.observe(Key::Space, 602).is_accepted());
        assert!(d.observe(Key::Space, 603).is_accepted());
    }
}
