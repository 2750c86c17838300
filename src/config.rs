use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    #[serde(default = "default_practice_text")]
    pub practice_text: String,
    #[serde(default = "default_content_id")]
    pub content_id: String,
    #[serde(default = "default_slow_sequence_limit")]
    pub slow_sequence_limit: usize,
    #[serde(default = "default_sequence_results")]
    pub sequence_results: usize,
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_duration_secs() -> f64 {
    30.0
}
fn default_practice_text() -> String {
    "the quick brown fox jumps over the lazy dog pack my box with five dozen liquor jugs"
        .to_string()
}
fn default_content_id() -> String {
    "default".to_string()
}
fn default_slow_sequence_limit() -> usize {
    10
}
fn default_sequence_results() -> usize {
    10
}
fn default_history_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordpace")
        .to_string_lossy()
        .to_string()
}
fn default_history_cap() -> usize {
    500
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            practice_text: default_practice_text(),
            content_id: default_content_id(),
            slow_sequence_limit: default_slow_sequence_limit(),
            sequence_results: default_sequence_results(),
            history_dir: default_history_dir(),
            history_cap: default_history_cap(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordpace")
            .join("config.toml")
    }

    /// Rejects values a session could never be initialized with.
    pub fn validate(&self) -> Result<()> {
        if self.duration_secs.is_nan() || self.duration_secs <= 0.0 {
            bail!(
                "invalid config: duration_secs must be positive, got {}",
                self.duration_secs
            );
        }
        if self.practice_text.split_whitespace().next().is_none() {
            bail!("invalid config: practice_text has no words");
        }
        Ok(())
    }

    pub fn practice_words(&self) -> Vec<String> {
        self.practice_text
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn history_path(&self) -> PathBuf {
        PathBuf::from(&self.history_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.duration_secs, 30.0);
        assert_eq!(config.content_id, "default");
        assert_eq!(config.slow_sequence_limit, 10);
        assert_eq!(config.sequence_results, 10);
        assert_eq!(config.history_cap, 500);
        assert_eq!(config.log_level, "warn");
        assert!(config.history_dir.contains("wordpace"));
        assert!(!config.practice_words().is_empty());
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
duration_secs = 60.0
content_id = "quotes"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.duration_secs, 60.0);
        assert_eq!(config.content_id, "quotes");
        assert_eq!(config.history_cap, 500);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.duration_secs = 45.0;
        config.history_cap = 7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.duration_secs = 0.0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("duration_secs"));

        config.duration_secs = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let mut config = Config::default();
        config.practice_text = "   ".to_string();
        assert!(config.validate().is_err());
    }
}
