use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MAX_ADVANCE_DELAY_MS: u64 = 5000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Pause after a finished pattern before the next one is shown.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns_file: Option<String>,
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strokr")
}
fn default_theme() -> String {
    "midnight".to_string()
}
fn default_advance_delay_ms() -> u64 {
    400
}
fn default_stats_file() -> String {
    data_dir()
        .join("keystroke_stats.json")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> String {
    data_dir().join("strokr.log").to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            advance_delay_ms: default_advance_delay_ms(),
            patterns_file: None,
            stats_file: default_stats_file(),
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("strokr")
            .join("config.toml")
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Clamp out-of-range values and reset an unknown theme.
    pub fn validate(&mut self, known_themes: &[String]) {
        self.advance_delay_ms = self.advance_delay_ms.min(MAX_ADVANCE_DELAY_MS);
        if !known_themes.iter().any(|t| *t == self.theme) {
            self.theme = default_theme();
        }
        if self.stats_file.trim().is_empty() {
            self.stats_file = default_stats_file();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes() -> Vec<String> {
        vec!["midnight".to_string(), "paper".to_string()]
    }

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "midnight");
        assert_eq!(config.advance_delay_ms, 400);
        assert!(config.patterns_file.is_none());
        assert!(config.stats_file.ends_with("keystroke_stats.json"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
theme = "paper"
patterns_file = "/tmp/drills.txt"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "paper");
        assert_eq!(config.patterns_file.as_deref(), Some("/tmp/drills.txt"));
        assert_eq!(config.advance_delay_ms, 400);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.stats_file, deserialized.stats_file);
        assert_eq!(config.advance_delay_ms, deserialized.advance_delay_ms);
        assert_eq!(config.log_file, deserialized.log_file);
    }

    #[test]
    fn test_validate_clamps_delay() {
        let mut config = Config::default();
        config.advance_delay_ms = 60_000;
        config.validate(&themes());
        assert_eq!(config.advance_delay_ms, MAX_ADVANCE_DELAY_MS);
        assert_eq!(config.advance_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_validate_resets_unknown_theme() {
        let mut config = Config::default();
        config.theme = "neon".to_string();
        config.validate(&themes());
        assert_eq!(config.theme, "midnight");

        config.theme = "paper".to_string();
        config.validate(&themes());
        assert_eq!(config.theme, "paper");
    }

    #[test]
    fn test_validate_restores_blank_stats_path() {
        let mut config = Config::default();
        config.stats_file = "  ".to_string();
        config.validate(&themes());
        assert!(config.stats_file.ends_with("keystroke_stats.json"));
    }
}
