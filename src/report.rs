use std::fmt::Write;

use crate::stats::StatsAggregator;
use crate::ui::format;

/// Plain-text stats summary for `--stats`.
pub fn stats_report(stats: &StatsAggregator) -> String {
    let mut out = String::new();
    let summaries = stats.summaries();

    if summaries.is_empty() {
        out.push_str("No attempts recorded yet.\n");
    } else {
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>8} {:>10} {:>10} {:>7} {:>5}  weakest",
            "pattern", "tries", "perfect", "best", "avg", "streak", "top"
        );
        for s in summaries {
            let _ = writeln!(
                out,
                "{:<24} {:>6} {:>7.0}% {:>10} {:>10} {:>7} {:>5}  {}",
                s.name,
                s.attempts,
                s.perfect_rate * 100.0,
                format::optional_time(s.best_time),
                format::optional_time(s.average_time),
                s.current_streak,
                s.best_streak,
                s.weakest.as_deref().unwrap_or("-"),
            );
        }
    }

    let all = stats.stats();
    let _ = writeln!(
        out,
        "\nsessions: {}  training time: {}",
        all.total_sessions,
        format::session_time(all.total_train_time)
    );
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pattern::Pattern;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_empty_report() {
        let stats = StatsAggregator::new(Box::new(MemoryStore::new()));
        let report = stats_report(&stats);
        assert!(report.contains("No attempts recorded yet."));
        assert!(report.contains("sessions: 0"));
    }

    #[test]
    fn test_report_lists_patterns_with_weakest_token() {
        let mut stats = StatsAggregator::new(Box::new(MemoryStore::new()));
        let p = Pattern::new("Click drill", "aLC");
        stats.record_mistake(&p, 1, "LC", "x");
        stats.record_attempt(&p, Duration::from_millis(900), 1);
        let report = stats_report(&stats);
        let line = report
            .lines()
            .find(|l| l.starts_with("Click drill"))
            .unwrap();
        assert!(line.contains("0%"));
        assert!(line.ends_with("LC"));
    }
}
