use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BackroomError, Result};

/// Settings for the whole binary, read from `~/.backroom/config.toml` unless
/// overridden. Any section or field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackroomConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl BackroomConfig {
    /// Read and validate the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&raw)?;
        parsed.chat.validate()?;
        debug!(path = %path.display(), "Parsed config file");
        Ok(parsed)
    }

    /// Like [`BackroomConfig::load`], but any failure yields the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config unusable, falling back to defaults");
            Self::default()
        })
    }

    /// Write this configuration as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = toml::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, rendered)?;
        debug!(path = %path.display(), "Wrote config file");
        Ok(())
    }
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when neither `RUST_LOG` nor `--log-level` is given.
    pub log_level: String,
    /// JSON file holding the dashboard statistics snapshot. Empty means the
    /// built-in sample snapshot.
    pub stats_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: String::from("info"),
            stats_path: String::new(),
        }
    }
}

/// Timing and presentation settings for the chat widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay unit between greeting messages. Message `i` lands at `i` units.
    pub greeting_delay_ms: u64,
    /// Extra delay after the last greeting message before suggestions show.
    pub suggestions_delay_ms: u64,
    /// Lower bound of the synthetic thinking delay.
    pub thinking_delay_min_ms: u64,
    /// Upper bound of the synthetic thinking delay (inclusive).
    pub thinking_delay_max_ms: u64,
    /// Interval between revealed characters.
    pub reveal_interval_ms: u64,
    /// Currency label used when quoting money amounts.
    pub currency: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 1000,
            suggestions_delay_ms: 500,
            thinking_delay_min_ms: 800,
            thinking_delay_max_ms: 1500,
            reveal_interval_ms: 20,
            currency: "GHS".to_string(),
        }
    }
}

impl ChatConfig {
    /// Check that the timing values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.thinking_delay_min_ms > self.thinking_delay_max_ms {
            return Err(BackroomError::Config(format!(
                "thinking_delay_min_ms ({}) exceeds thinking_delay_max_ms ({})",
                self.thinking_delay_min_ms, self.thinking_delay_max_ms
            )));
        }
        if self.reveal_interval_ms == 0 {
            return Err(BackroomError::Config(
                "reveal_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    pub fn suggestions_delay(&self) -> Duration {
        Duration::from_millis(self.suggestions_delay_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(body: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(body.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = BackroomConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.general.stats_path.is_empty());
        assert_eq!(config.chat.greeting_delay_ms, 1000);
        assert_eq!(config.chat.suggestions_delay_ms, 500);
        assert_eq!(config.chat.thinking_delay_min_ms, 800);
        assert_eq!(config.chat.thinking_delay_max_ms, 1500);
        assert_eq!(config.chat.reveal_interval_ms, 20);
        assert_eq!(config.chat.currency, "GHS");
    }

    #[test]
    fn test_load_full_file() {
        let content = r#"
[general]
log_level = "debug"
stats_path = "/srv/backroom/stats.json"

[chat]
greeting_delay_ms = 250
suggestions_delay_ms = 100
thinking_delay_min_ms = 300
thinking_delay_max_ms = 300
reveal_interval_ms = 5
currency = "USD"
"#;
        let file = toml_file(content);
        let config = BackroomConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.stats_path, "/srv/backroom/stats.json");
        assert_eq!(config.chat.greeting_delay(), Duration::from_millis(250));
        assert_eq!(config.chat.suggestions_delay(), Duration::from_millis(100));
        assert_eq!(config.chat.reveal_interval(), Duration::from_millis(5));
        assert_eq!(config.chat.currency, "USD");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let content = r#"
[chat]
reveal_interval_ms = 40
"#;
        let file = toml_file(content);
        let config = BackroomConfig::load(file.path()).unwrap();
        assert_eq!(config.chat.reveal_interval_ms, 40);
        assert_eq!(config.chat.greeting_delay_ms, 1000);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_rejects_inverted_thinking_range() {
        let content = r#"
[chat]
thinking_delay_min_ms = 2000
thinking_delay_max_ms = 100
"#;
        let file = toml_file(content);
        let err = BackroomConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, BackroomError::Config(_)));
        assert!(err.to_string().contains("thinking_delay_min_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_reveal_interval() {
        let chat = ChatConfig {
            reveal_interval_ms: 0,
            ..ChatConfig::default()
        };
        assert!(chat.validate().is_err());
        assert!(ChatConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let file = toml_file("[chat\ngreeting_delay_ms = ");
        assert!(BackroomConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let config = BackroomConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.chat, ChatConfig::default());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = BackroomConfig::default();
        config.chat.currency = "NGN".to_string();
        config.save(&path).unwrap();

        assert_eq!(BackroomConfig::load(&path).unwrap(), config);
    }
}
