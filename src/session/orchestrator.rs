use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::pattern::Pattern;
use crate::pattern::token::Token;
use crate::session::matcher::{MatchEngine, MatchOutcome, MistakeEvent, PatternCompletion};
use crate::session::queue::PatternQueue;
use crate::stats::StatsAggregator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Stopped,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Ended(EndReason),
}

/// What a submitted token did, for the view layer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Accepted,
    Mistake {
        mistake: MistakeEvent,
        saved: bool,
    },
    PatternFinished {
        completion: PatternCompletion,
        new_best: bool,
        saved: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingAdvance {
    generation: u64,
    due: Instant,
}

/// Snapshot of a finished session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub patterns_total: u32,
    pub patterns_perfect: u32,
    pub duration: Duration,
    pub saved: bool,
}

pub struct SessionOrchestrator {
    patterns: Vec<Pattern>,
    queue: PatternQueue,
    engine: MatchEngine,
    stats: StatsAggregator,
    state: SessionState,
    generation: u64,
    pending: Option<PendingAdvance>,
    advance_delay: Duration,
    session_start: Option<DateTime<Utc>>,
    session_started_at: Option<Instant>,
    patterns_total: u32,
    patterns_perfect: u32,
    last_summary: Option<SessionSummary>,
    rng: SmallRng,
}

impl SessionOrchestrator {
    pub fn new(patterns: Vec<Pattern>, stats: StatsAggregator, advance_delay: Duration) -> Self {
        Self::with_rng(patterns, stats, advance_delay, SmallRng::from_entropy())
    }

    pub fn with_rng(
        patterns: Vec<Pattern>,
        stats: StatsAggregator,
        advance_delay: Duration,
        rng: SmallRng,
    ) -> Self {
        let (patterns, empty): (Vec<Pattern>, Vec<Pattern>) =
            patterns.into_iter().partition(|p| !p.is_empty());
        if !empty.is_empty() {
            warn!(skipped = empty.len(), "ignoring patterns without tokens");
        }
        Self {
            patterns,
            queue: PatternQueue::default(),
            engine: MatchEngine::new(),
            stats,
            state: SessionState::Idle,
            generation: 0,
            pending: None,
            advance_delay,
            session_start: None,
            session_started_at: None,
            patterns_total: 0,
            patterns_perfect: 0,
            last_summary: None,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Patterns still to do in this session, the active one included.
    pub fn remaining(&self) -> usize {
        let active = usize::from(self.engine.active().is_some() && self.pending.is_none());
        self.queue.len() + active
    }

    pub fn patterns_total(&self) -> u32 {
        self.patterns_total
    }

    pub fn patterns_perfect(&self) -> u32 {
        self.patterns_perfect
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn advance_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn session_elapsed(&self, now: Instant) -> Duration {
        self.session_started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.queue = PatternQueue::shuffled(&self.patterns, &mut self.rng);
        self.generation += 1;
        self.pending = None;
        self.patterns_total = 0;
        self.patterns_perfect = 0;
        self.last_summary = None;
        self.session_start = Some(self.stats.start_session());
        self.session_started_at = Some(now);
        self.state = SessionState::Running;
        info!(generation = self.generation, patterns = self.queue.len(), "session started");
        self.advance(now);
    }

    pub fn submit(&mut self, token: Token, now: Instant) -> Option<SessionEvent> {
        if !self.is_running() {
            return None;
        }
        match self.engine.submit(token, now) {
            MatchOutcome::Ignored => None,
            MatchOutcome::Accepted => Some(SessionEvent::Accepted),
            MatchOutcome::Reset(mistake) => {
                if let Some(pattern) = self.engine.active() {
                    let expected = mistake.expected_label();
                    let actual = mistake.actual.to_string();
                    self.stats
                        .record_mistake(pattern, mistake.position, &expected, &actual);
                }
                let saved = self.stats.persist().is_ok();
                Some(SessionEvent::Mistake { mistake, saved })
            }
            MatchOutcome::Completed(completion) => Some(self.finish_pattern(completion, now)),
        }
    }

    fn finish_pattern(&mut self, completion: PatternCompletion, now: Instant) -> SessionEvent {
        self.patterns_total += 1;
        self.stats.record_attempt(
            &completion.pattern,
            completion.elapsed,
            completion.reset_count,
        );

        let new_best = completion.is_perfect()
            && self.stats.best_time(&completion.pattern.text) == Some(completion.elapsed);
        if completion.is_perfect() {
            self.patterns_perfect += 1;
        } else {
            self.queue.requeue(completion.pattern.clone());
        }
        let saved = self.stats.persist().is_ok();

        self.pending = Some(PendingAdvance {
            generation: self.generation,
            due: now + self.advance_delay,
        });
        debug!(
            pattern = %completion.pattern.text,
            resets = completion.reset_count,
            new_best,
            "pattern finished"
        );

        SessionEvent::PatternFinished {
            completion,
            new_best,
            saved,
        }
    }

    /// Run the deferred advance once it is due. Returns true if it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.generation != self.generation || !self.is_running() {
            self.pending = None;
            return false;
        }
        if now < pending.due {
            return false;
        }
        self.pending = None;
        self.advance(now);
        true
    }

    fn advance(&mut self, now: Instant) {
        match self.queue.dequeue_next() {
            Some(pattern) => self.engine.load(pattern),
            None => self.finish_session(EndReason::Completed, now),
        }
    }

    /// Abort the running session. Partial progress on the active pattern is
    /// discarded without counting as an attempt.
    pub fn stop(&mut self, now: Instant) {
        if !self.is_running() {
            return;
        }
        self.finish_session(EndReason::Stopped, now);
    }

    fn finish_session(&mut self, reason: EndReason, now: Instant) {
        self.engine.clear();
        self.pending = None;
        self.state = SessionState::Ended(reason);

        let start = self.session_start.take().unwrap_or_else(Utc::now);
        let saved = self
            .stats
            .end_session(
                start,
                self.patterns_total,
                self.patterns_perfect,
                reason == EndReason::Completed,
            )
            .is_ok();

        self.last_summary = Some(SessionSummary {
            reason,
            patterns_total: self.patterns_total,
            patterns_perfect: self.patterns_perfect,
            duration: self.session_elapsed(now),
            saved,
        });
    }
}
