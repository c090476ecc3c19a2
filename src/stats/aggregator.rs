use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::pattern::Pattern;
use crate::stats::schema::{AllStats, MISTAKE_HISTORY_LIMIT, Mistake, PatternStats, SessionRecord};
use crate::store::{StatsSink, StoreError};

/// One row of the stats screen.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSummary {
    pub name: String,
    pub pattern: String,
    pub attempts: u32,
    pub perfect_rate: f64,
    pub best_time: Option<Duration>,
    pub average_time: Option<Duration>,
    pub current_streak: u32,
    pub best_streak: u32,
    pub weakest: Option<String>,
}

/// Sole owner of [`AllStats`]. Everything else submits events.
pub struct StatsAggregator {
    stats: AllStats,
    sink: Box<dyn StatsSink>,
}

impl StatsAggregator {
    pub fn new(sink: Box<dyn StatsSink>) -> Self {
        let stats = sink.load();
        debug!(
            patterns = stats.pattern_stats.len(),
            sessions = stats.total_sessions,
            "stats loaded"
        );
        Self { stats, sink }
    }

    pub fn stats(&self) -> &AllStats {
        &self.stats
    }

    fn entry(&mut self, pattern: &Pattern) -> &mut PatternStats {
        self.stats
            .pattern_stats
            .entry(pattern.text.clone())
            .or_insert_with(|| PatternStats::new(&pattern.text, &pattern.name))
    }

    pub fn record_attempt(&mut self, pattern: &Pattern, elapsed: Duration, reset_count: u32) {
        let ps = self.entry(pattern);
        ps.total_attempts += 1;
        ps.total_time += elapsed;
        ps.total_resets += reset_count;
        ps.last_practiced = Some(Utc::now());

        if reset_count == 0 {
            ps.perfect_count += 1;
            ps.current_streak += 1;
            ps.best_streak = ps.best_streak.max(ps.current_streak);
            if ps.best_time.is_none_or(|best| elapsed < best) {
                ps.best_time = Some(elapsed);
            }
        } else {
            ps.current_streak = 0;
        }
    }

    pub fn record_mistake(
        &mut self,
        pattern: &Pattern,
        position: usize,
        expected: &str,
        actual: &str,
    ) {
        let ps = self.entry(pattern);
        ps.mistakes.push(Mistake {
            position,
            expected: expected.to_string(),
            actual: actual.to_string(),
            timestamp: Utc::now(),
        });
        if ps.mistakes.len() > MISTAKE_HISTORY_LIMIT {
            let excess = ps.mistakes.len() - MISTAKE_HISTORY_LIMIT;
            ps.mistakes.drain(..excess);
        }
    }

    pub fn start_session(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Append the session record and write everything out.
    pub fn end_session(
        &mut self,
        start: DateTime<Utc>,
        total: u32,
        perfect: u32,
        completed: bool,
    ) -> Result<(), StoreError> {
        let end = Utc::now();
        let duration = (end - start).to_std().unwrap_or_default();

        self.stats.sessions.push(SessionRecord {
            start_time: start,
            end_time: end,
            duration,
            patterns_total: total,
            patterns_perfect: perfect,
            completed,
        });
        self.stats.total_sessions += 1;
        self.stats.total_train_time += duration;
        info!(total, perfect, completed, secs = duration.as_secs_f64(), "session ended");

        self.persist()
    }

    /// Save the whole document. On failure the in-memory state is kept and
    /// the next call retries.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.stats.last_updated = Some(Utc::now());
        self.sink.save(&self.stats).inspect_err(|e| {
            warn!(error = %e, "failed to save stats");
        })
    }

    pub fn pattern(&self, text: &str) -> Option<&PatternStats> {
        self.stats.pattern_stats.get(text)
    }

    pub fn best_time(&self, text: &str) -> Option<Duration> {
        self.pattern(text).and_then(|ps| ps.best_time)
    }

    pub fn current_streak(&self, text: &str) -> u32 {
        self.pattern(text).map_or(0, |ps| ps.current_streak)
    }

    pub fn best_streak(&self, text: &str) -> u32 {
        self.pattern(text).map_or(0, |ps| ps.best_streak)
    }

    pub fn average_time(&self, text: &str) -> Option<Duration> {
        let ps = self.pattern(text)?;
        (ps.total_attempts > 0).then(|| ps.total_time / ps.total_attempts)
    }

    pub fn perfect_rate(&self, text: &str) -> f64 {
        match self.pattern(text) {
            Some(ps) if ps.total_attempts > 0 => {
                ps.perfect_count as f64 / ps.total_attempts as f64
            }
            _ => 0.0,
        }
    }

    /// Most frequently expected tokens among recorded mistakes.
    pub fn weakest_tokens(&self, text: &str, n: usize) -> Vec<(String, usize)> {
        let Some(ps) = self.pattern(text) else {
            return Vec::new();
        };
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for m in &ps.mistakes {
            *counts.entry(m.expected.as_str()).or_default() += 1;
        }
        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(token, count)| (token.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn summaries(&self) -> Vec<PatternSummary> {
        self.stats
            .pattern_stats
            .values()
            .map(|ps| PatternSummary {
                name: ps.name.clone(),
                pattern: ps.pattern.clone(),
                attempts: ps.total_attempts,
                perfect_rate: self.perfect_rate(&ps.pattern),
                best_time: ps.best_time,
                average_time: self.average_time(&ps.pattern),
                current_streak: ps.current_streak,
                best_streak: ps.best_streak,
                weakest: self
                    .weakest_tokens(&ps.pattern, 1)
                    .into_iter()
                    .next()
                    .map(|(token, _)| token),
            })
            .collect()
    }
}
