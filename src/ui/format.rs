use std::time::Duration;

/// Millisecond precision: `850ms`, `1.234s`, `1m2.500s`.
pub fn attempt_time(d: Duration) -> String {
    let ms = (d.as_nanos() + 500_000) / 1_000_000;
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let minutes = ms / 60_000;
    let rest = ms % 60_000;
    let secs = format!("{}.{:03}s", rest / 1000, rest % 1000);
    if minutes > 0 {
        format!("{minutes}m{secs}")
    } else {
        secs
    }
}

/// Whole seconds: `45s`, `2m5s`, `1h0m12s`.
pub fn session_time(d: Duration) -> String {
    let total = (d.as_millis() + 500) / 1000;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

pub fn optional_time(d: Option<Duration>) -> String {
    d.map_or_else(|| "-".to_string(), attempt_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_time() {
        assert_eq!(attempt_time(Duration::from_micros(850_400)), "850ms");
        assert_eq!(attempt_time(Duration::from_millis(1234)), "1.234s");
        assert_eq!(attempt_time(Duration::from_millis(62_500)), "1m2.500s");
        assert_eq!(attempt_time(Duration::ZERO), "0ms");
    }

    #[test]
    fn test_session_time() {
        assert_eq!(session_time(Duration::from_millis(44_600)), "45s");
        assert_eq!(session_time(Duration::from_secs(125)), "2m5s");
        assert_eq!(session_time(Duration::from_secs(3612)), "1h0m12s");
    }

    #[test]
    fn test_optional_time() {
        assert_eq!(optional_time(None), "-");
        assert_eq!(optional_time(Some(Duration::from_millis(5))), "5ms");
    }
}
