use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Number of mistakes kept per pattern.
pub const MISTAKE_HISTORY_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mistake {
    pub position: usize,
    pub expected: String,
    pub actual: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    pub pattern: String,
    pub name: String,
    #[serde(default)]
    pub total_attempts: u32,
    #[serde(default)]
    pub perfect_count: u32,
    #[serde(default)]
    pub total_resets: u32,
    /// Fastest perfect attempt; `None` until the first one. A stored `0`
    /// also means no record.
    #[serde(default, with = "nanos::option")]
    pub best_time: Option<Duration>,
    #[serde(default, with = "nanos")]
    pub total_time: Duration,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mistakes: Vec<Mistake>,
}

impl PatternStats {
    pub fn new(pattern: &str, name: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(with = "nanos")]
    pub duration: Duration,
    pub patterns_total: u32,
    pub patterns_perfect: u32,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllStats {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pattern_stats: BTreeMap<String, PatternStats>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default, with = "nanos")]
    pub total_train_time: Duration,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Older documents write empty collections as `null`.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl Default for AllStats {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            pattern_stats: BTreeMap::new(),
            sessions: Vec::new(),
            total_sessions: 0,
            total_train_time: Duration::ZERO,
            last_updated: None,
        }
    }
}

/// Durations as integer nanoseconds.
mod nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_nanos(u64::deserialize(d)?))
    }

    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => super::serialize(d, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(d)?
                .filter(|&n| n > 0)
                .map(Duration::from_nanos))
        }
    }
}
