use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::stats::schema::AllStats;
use crate::store::{StatsSink, StoreError};

/// Stats document on disk as pretty-printed JSON.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl StatsSink for JsonStore {
    fn load(&self) -> AllStats {
        if !self.path.exists() {
            return AllStats::default();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read stats, starting fresh");
                return AllStats::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(stats) => stats,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "corrupt stats file, starting fresh"
                );
                AllStats::default()
            }
        }
    }

    fn save(&self, stats: &AllStats) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(stats)?;
        let written = Self::write_synced(&tmp_path, json.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), bytes = json.len(), "stats saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::DateTime;
    use tempfile::TempDir;

    use super::*;
    use crate::stats::schema::{Mistake, PatternStats, SessionRecord};

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("stats").join("keystroke_stats.json")).unwrap();
        (dir, store)
    }

    fn sample_stats() -> AllStats {
        let ts = DateTime::from_timestamp(1_750_000_000, 987_654_321).unwrap();
        let mut ps = PatternStats::new("1aLC", "Click Cycle");
        ps.total_attempts = 3;
        ps.perfect_count = 2;
        ps.total_resets = 1;
        ps.best_time = Some(Duration::from_nanos(812_345_679));
        ps.total_time = Duration::from_nanos(2_999_999_999);
        ps.current_streak = 1;
        ps.best_streak = 2;
        ps.last_practiced = Some(ts);
        ps.mistakes.push(Mistake {
            position: 2,
            expected: "LC".to_string(),
            actual: "RC".to_string(),
            timestamp: ts,
        });

        let mut stats = AllStats::default();
        stats.pattern_stats.insert(ps.pattern.clone(), ps);
        stats.sessions.push(SessionRecord {
            start_time: ts,
            end_time: ts,
            duration: Duration::from_nanos(41_000_000_017),
            patterns_total: 3,
            patterns_perfect: 2,
            completed: true,
        });
        stats.total_sessions = 1;
        stats.total_train_time = Duration::from_nanos(41_000_000_017);
        stats.last_updated = Some(ts);
        stats
    }

    #[test]
    fn test_round_trip_is_exact() {
        let (_dir, store) = make_test_store();
        let stats = sample_stats();
        store.save(&stats).unwrap();
        assert_eq!(store.load(), stats);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load(), AllStats::default());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let (_dir, store) = make_test_store();
        fs::write(store.path(), "{\"pattern_stats\": {\"1a\": ").unwrap();
        assert_eq!(store.load(), AllStats::default());
    }

    #[test]
    fn test_document_keys() {
        let (_dir, store) = make_test_store();
        store.save(&sample_stats()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        for key in [
            "pattern_stats",
            "sessions",
            "total_sessions",
            "total_train_time",
            "last_updated",
        ] {
            assert!(raw.get(key).is_some(), "missing key {key}");
        }
        let row = &raw["pattern_stats"]["1aLC"];
        assert_eq!(row["best_time"], 812_345_679u64);
        assert_eq!(row["mistakes"][0]["expected"], "LC");
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (_dir, store) = make_test_store();
        store.save(&sample_stats()).unwrap();
        let parent = store.path().parent().unwrap();
        let leftovers: Vec<_> = fs::read_dir(parent)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_failed_save_removes_tmp_file() {
        let (_dir, store) = make_test_store();
        // A non-empty directory where the document should go blocks the rename.
        fs::create_dir_all(store.path().join("occupied")).unwrap();
        assert!(store.save(&sample_stats()).is_err());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_loads_null_collections_from_older_files() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.path(),
            r#"{
                "pattern_stats": {"1a": {
                    "pattern": "1a", "name": "One", "total_attempts": 5,
                    "best_time": 0, "mistakes": null
                }},
                "sessions": null,
                "total_sessions": 3,
                "total_train_time": 12000000000
            }"#,
        )
        .unwrap();
        let stats = store.load();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_train_time, Duration::from_secs(12));
        let ps = &stats.pattern_stats["1a"];
        assert_eq!(ps.total_attempts, 5);
        assert_eq!(ps.best_time, None);
        assert!(ps.mistakes.is_empty());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore {
            path: dir.path().join("gone").join("stats.json"),
        };
        assert!(store.save(&AllStats::default()).is_err());
    }
}
