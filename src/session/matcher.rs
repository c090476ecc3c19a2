use std::time::{Duration, Instant};

use tracing::debug;

use crate::pattern::Pattern;
use crate::pattern::token::{self, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchState {
    Idle,
    AwaitingFirstInput,
    InProgress,
    Completed,
}

/// A wrong token on a non-empty buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MistakeEvent {
    /// Character offset into the pattern string.
    pub position: usize,
    pub expected: Option<Token>,
    pub actual: Token,
}

impl MistakeEvent {
    pub fn expected_label(&self) -> String {
        self.expected
            .map_or_else(|| token::UNKNOWN_TOKEN.to_string(), |t| t.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternCompletion {
    pub pattern: Pattern,
    pub elapsed: Duration,
    pub reset_count: u32,
}

impl PatternCompletion {
    pub fn is_perfect(&self) -> bool {
        self.reset_count == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Ignored,
    Accepted,
    Reset(MistakeEvent),
    Completed(PatternCompletion),
}

/// Validates input against the active pattern one token at a time.
///
/// The buffer is always a prefix of the active pattern's tokens. The timer
/// starts on the first accepted token and survives resets.
#[derive(Debug, Default)]
pub struct MatchEngine {
    active: Option<Pattern>,
    buffer: Vec<Token>,
    reset_count: u32,
    started_at: Option<Instant>,
    completed: bool,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, pattern: Pattern) {
        debug!(pattern = %pattern.text, "pattern loaded");
        self.active = Some(pattern);
        self.buffer.clear();
        self.reset_count = 0;
        self.started_at = None;
        self.completed = false;
    }

    /// Drop the active pattern and any partial progress.
    pub fn clear(&mut self) {
        self.active = None;
        self.buffer.clear();
        self.reset_count = 0;
        self.started_at = None;
        self.completed = false;
    }

    pub fn state(&self) -> MatchState {
        match (&self.active, self.completed) {
            (None, _) => MatchState::Idle,
            (Some(_), true) => MatchState::Completed,
            (Some(_), false) if self.buffer.is_empty() => MatchState::AwaitingFirstInput,
            (Some(_), false) => MatchState::InProgress,
        }
    }

    pub fn active(&self) -> Option<&Pattern> {
        self.active.as_ref()
    }

    pub fn buffer(&self) -> &[Token] {
        &self.buffer
    }

    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    pub fn submit(&mut self, token: Token, now: Instant) -> MatchOutcome {
        if self.completed {
            return MatchOutcome::Ignored;
        }
        let Some(pattern) = self.active.as_ref() else {
            return MatchOutcome::Ignored;
        };

        if pattern.tokens.get(self.buffer.len()) == Some(&token) {
            self.buffer.push(token);
            let started = *self.started_at.get_or_insert(now);
            if self.buffer.len() == pattern.tokens.len() {
                self.completed = true;
                return MatchOutcome::Completed(PatternCompletion {
                    pattern: pattern.clone(),
                    elapsed: now.saturating_duration_since(started),
                    reset_count: self.reset_count,
                });
            }
            return MatchOutcome::Accepted;
        }

        if self.buffer.is_empty() {
            return MatchOutcome::Ignored;
        }

        let position: usize = self.buffer.iter().map(|t| t.text_len()).sum();
        let mistake = MistakeEvent {
            position,
            expected: token::token_at_offset(&pattern.tokens, position),
            actual: token,
        };
        debug!(position, expected = %mistake.expected_label(), actual = %token, "reset");
        self.reset_count += 1;
        self.buffer.clear();
        MatchOutcome::Reset(mistake)
    }
}
