//! Typing session - the sentence queue and the player's input buffer.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

use crate::types::Key;

/// Sentence used when no other targets are configured.
pub const DEFAULT_SENTENCE: &str = "the quick brown fox jumps over the lazy dog";

/// What a keystroke did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOutcome {
    /// Buffer changed, current sentence not complete yet.
    Typed,
    /// Current sentence matched; the next one is now the target.
    SentenceCompleted { next: String },
    /// Last sentence matched; the queue is empty.
    Finished,
}

/// How far the buffer agrees with the current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchProgress {
    /// Length (in chars) of the longest common prefix of buffer and target.
    pub matched: usize,
    /// Buffer is non-empty and is not a prefix of the target.
    pub mismatch: bool,
}

#[derive(Debug, Clone)]
pub struct TypingSession {
    queue: VecDeque<String>,
    buffer: String,
}

impl TypingSession {
    pub fn new<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: sentences.into_iter().map(Into::into).collect(),
            buffer: String::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn current_target(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Target character at the buffer's cursor.
    ///
    /// Positional: it is the character at index `buffer.len()` of the current
    /// sentence even if earlier characters were typed wrong.
    pub fn current_target_char(&self) -> Option<char> {
        let target = self.queue.front()?;
        target.chars().nth(self.buffer.chars().count())
    }

    pub fn progress(&self) -> MatchProgress {
        let Some(target) = self.queue.front() else {
            return MatchProgress::default();
        };
        let matched = self
            .buffer
            .chars()
            .zip(target.chars())
            .take_while(|(typed, wanted)| typed == wanted)
            .count();
        let mismatch = !self.buffer.is_empty() && !target.starts_with(self.buffer.as_str());
        MatchProgress { matched, mismatch }
    }

    /// Apply a keystroke and advance the queue when the sentence matches.
    pub fn type_key(&mut self, key: Key) -> TypeOutcome {
        match key.as_char() {
            Some(c) => self.buffer.push(c),
            None => {
                self.buffer.pop();
            }
        }

        if self.queue.front().map(String::as_str) != Some(self.buffer.as_str()) {
            return TypeOutcome::Typed;
        }

        self.queue.pop_front();
        self.buffer.clear();
        match self.queue.front() {
            Some(next) => {
                info!(remaining = self.queue.len(), "sentence completed");
                TypeOutcome::SentenceCompleted { next: next.clone() }
            }
            None => TypeOutcome::Finished,
        }
    }
}

impl Default for TypingSession {
    fn default() -> Self {
        Self::new([DEFAULT_SENTENCE])
    }
}
