use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::pattern::Pattern;

/// File name looked up in the working directory and next to the executable.
pub const PATTERNS_FILE: &str = "keystroke_patterns.txt";

const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("5 Group Cycle", "1a2a3a4a5a"),
    ("4 Group Cycle", "1a2a3a4a"),
    ("3 Group Cycle", "1a2a3a"),
    ("F-Key Cycle", "F1aF2aF3a"),
    ("Click Practice", "LCaRCa"),
];

pub trait PatternSource {
    /// Ordered pattern list. Never empty: sources fall back to the defaults.
    fn load(&self) -> Vec<Pattern>;
}

pub fn default_patterns() -> Vec<Pattern> {
    DEFAULT_PATTERNS
        .iter()
        .map(|(name, text)| Pattern::new(name, text))
        .collect()
}

/// Parse the line format: `Name|Tokens`, or a bare line used as both.
/// Blank lines and `#` comments are skipped, as are entries with no tokens.
pub fn parse_patterns(content: &str) -> Vec<Pattern> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let pattern = match line.split_once('|') {
                Some((name, text)) => Pattern::new(name, text),
                None => Pattern::new(line, line),
            };
            (!pattern.is_empty()).then_some(pattern)
        })
        .collect()
}

/// Reads the first candidate file that yields at least one pattern.
pub struct FilePatternSource {
    candidates: Vec<PathBuf>,
}

impl FilePatternSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Explicit path (if any), then `./keystroke_patterns.txt`, then the
    /// executable's directory.
    pub fn with_standard_locations(explicit: Option<PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = explicit.into_iter().collect();
        candidates.push(PathBuf::from(PATTERNS_FILE));
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(PATTERNS_FILE));
        }
        Self::new(candidates)
    }

    fn read(path: &Path) -> Option<Vec<Pattern>> {
        let content = fs::read_to_string(path).ok()?;
        let patterns = parse_patterns(&content);
        if patterns.is_empty() {
            warn!(path = %path.display(), "pattern file has no usable entries");
            return None;
        }
        Some(patterns)
    }
}

impl PatternSource for FilePatternSource {
    fn load(&self) -> Vec<Pattern> {
        for path in &self.candidates {
            if let Some(patterns) = Self::read(path) {
                debug!(path = %path.display(), count = patterns.len(), "loaded patterns");
                return patterns;
            }
        }
        warn!("no pattern file found, using built-in patterns");
        default_patterns()
    }
}
