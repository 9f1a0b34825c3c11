//! Error analysis - attributes wrong keystrokes to the hand that caused them
//!
//! Every accepted keystroke that differs from the target character is
//! compared against the chord the target needs:
//!
//! 1. Left pose differs → [`ErrorKind::BlockSelection`]
//! 2. Otherwise right pose differs → [`ErrorKind::CharacterSelection`]
//!
//! The checks are exclusive and run in that order, so a chord with both hands
//! wrong counts as a block-selection error. [`ErrorKind::Coordination`] is
//! kept in the counters and the report but the classifier never emits it.
//!
//! Targets without a chord (punctuation, digits, capitals) are not classified
//! and do not count as attempts.

use serde::Serialize;
use tracing::info;

use crate::codebook::expected_for_char;
use crate::types::{ErrorKind, GesturePair, Key};

/// One classified mistake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Milliseconds on the session clock.
    pub timestamp_ms: u64,
    pub target_char: char,
    pub actual: Key,
    pub error_type: ErrorKind,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ErrorCounters {
    pub block_selection_errors: u32,
    pub character_selection_errors: u32,
    pub coordination_errors: u32,
    pub total_attempts: u32,
}

impl ErrorCounters {
    pub fn total_errors(&self) -> u32 {
        self.block_selection_errors
            .saturating_add(self.character_selection_errors)
            .saturating_add(self.coordination_errors)
    }
}

/// Counts and percentage rates, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ErrorReport {
    pub block_selection_errors: u32,
    pub character_selection_errors: u32,
    pub coordination_errors: u32,
    pub total_attempts: u32,
    pub block_selection_rate: f64,
    pub character_selection_rate: f64,
    pub coordination_rate: f64,
    pub total_error_rate: f64,
}

impl ErrorReport {
    pub fn from_counters(counters: &ErrorCounters) -> Self {
        let total = counters.total_attempts;
        Self {
            block_selection_errors: counters.block_selection_errors,
            character_selection_errors: counters.character_selection_errors,
            coordination_errors: counters.coordination_errors,
            total_attempts: total,
            block_selection_rate: percent(counters.block_selection_errors, total),
            character_selection_rate: percent(counters.character_selection_errors, total),
            coordination_rate: percent(counters.coordination_errors, total),
            total_error_rate: percent(counters.total_errors(), total),
        }
    }

    /// End-of-game console summary.
    pub fn summary_lines(&self) -> [String; 6] {
        [
            "=== Error analysis ===".to_string(),
            format!("Attempts: {}", self.total_attempts),
            format!(
                "Block selection errors: {} ({:.1}%)",
                self.block_selection_errors, self.block_selection_rate
            ),
            format!(
                "Character selection errors: {} ({:.1}%)",
                self.character_selection_errors, self.character_selection_rate
            ),
            format!(
                "Coordination errors: {} ({:.1}%)",
                self.coordination_errors, self.coordination_rate
            ),
            format!("Total error rate: {:.1}%", self.total_error_rate),
        ]
    }
}

/// `100 * count / total` rounded to one decimal; 0 when there were no attempts.
fn percent(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(count) * 100.0 / f64::from(total);
    (raw * 10.0).round() / 10.0
}

/// Session-scoped error counters and log.
#[derive(Debug, Clone, Default)]
pub struct ErrorAnalysis {
    counters: ErrorCounters,
    records: Vec<ErrorRecord>,
}

impl ErrorAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counters = ErrorCounters::default();
        self.records.clear();
    }

    pub fn counters(&self) -> ErrorCounters {
        self.counters
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_counters(&self.counters)
    }

    /// Classify a keystroke against its target.
    ///
    /// Returns the appended record, or `None` when nothing was classified
    /// (keystroke was correct, or the target has no chord).
    pub fn classify(
        &mut self,
        target: char,
        actual_pair: GesturePair,
        actual: Key,
        now_ms: u64,
    ) -> Option<ErrorRecord> {
        if actual.matches_char(target) {
            return None;
        }
        let expected = expected_for_char(target)?;

        let (error_type, details) = if actual_pair.left != expected.left {
            (
                ErrorKind::BlockSelection,
                format!(
                    "Expected left: {}, Got: {}",
                    expected.left, actual_pair.left
                ),
            )
        } else if actual_pair.right != expected.right {
            (
                ErrorKind::CharacterSelection,
                format!(
                    "Expected right: {}, Got: {}",
                    expected.right, actual_pair.right
                ),
            )
        } else {
            // Expected chord but a different key: impossible while the
            // codebook is one-to-one.
            return None;
        };

        self.counters.total_attempts += 1;
        match error_type {
            ErrorKind::BlockSelection => self.counters.block_selection_errors += 1,
            ErrorKind::CharacterSelection => self.counters.character_selection_errors += 1,
            ErrorKind::Coordination => self.counters.coordination_errors += 1,
        }

        let record = ErrorRecord {
            timestamp_ms: now_ms,
            target_char: target,
            actual,
            error_type,
            details,
        };
        info!(kind = %record.error_type, details = %record.details, "error detected");
        self.records.push(record.clone());
        Some(record)
    }
}
