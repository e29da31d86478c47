use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::level::DEFAULT_ARCADE_LEVELS;

pub const MIN_TICK_RATE_MS: u64 = 5;
pub const MAX_TICK_RATE_MS: u64 = 250;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_show_fingers")]
    pub show_fingers: bool,
    #[serde(default)]
    pub bell: bool,
    #[serde(default = "default_practice_level")]
    pub practice_level: u32,
    /// Directory whose content files replace the bundled ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_dir: Option<PathBuf>,
    #[serde(default)]
    pub arcade: ArcadeConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcadeConfig {
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
}

fn default_tick_rate_ms() -> u64 {
    16
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_show_fingers() -> bool {
    true
}
fn default_practice_level() -> u32 {
    1
}
fn default_time_limit_secs() -> u32 {
    60
}
fn default_start_level() -> u32 {
    1
}
fn default_max_level() -> u32 {
    DEFAULT_ARCADE_LEVELS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            theme: default_theme(),
            show_fingers: default_show_fingers(),
            bell: false,
            practice_level: default_practice_level(),
            content_dir: None,
            arcade: ArcadeConfig::default(),
        }
    }
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
            start_level: default_start_level(),
            max_level: default_max_level(),
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
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
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
            .join("keychase")
            .join("config.toml")
    }

    /// Pull out-of-range values back into range. Call after deserialization
    /// or after CLI overrides.
    pub fn normalize(&mut self) {
        let tick = self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS);
        if tick != self.tick_rate_ms {
            warn!(from = self.tick_rate_ms, to = tick, "tick_rate_ms out of range");
            self.tick_rate_ms = tick;
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        self.practice_level = self.practice_level.max(1);
        self.arcade.normalize();
    }
}

impl ArcadeConfig {
    pub fn normalize(&mut self) {
        if self.time_limit_secs == 0 {
            warn!("arcade time limit of 0s, using default");
            self.time_limit_secs = default_time_limit_secs();
        }
        self.max_level = self.max_level.max(1);
        self.start_level = self.start_level.clamp(1, self.max_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.theme, "terminal-default");
        assert!(config.show_fingers);
        assert!(!config.bell);
        assert_eq!(config.arcade.time_limit_secs, 60);
        assert_eq!(config.arcade.max_level, 10);
    }

    #[test]
    fn test_config_serde_partial_arcade_section() {
        let toml_str = r#"
bell = true

[arcade]
time_limit_secs = 90
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.bell);
        assert_eq!(config.arcade.time_limit_secs, 90);
        // missing keys fall back to defaults
        assert_eq!(config.arcade.start_level, 1);
        assert_eq!(config.arcade.max_level, 10);
        assert_eq!(config.practice_level, 1);
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.theme = "catppuccin-mocha".to_string();
        config.content_dir = Some(PathBuf::from("/tmp/words"));
        config.arcade.start_level = 4;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_clamps_values() {
        let mut config = Config::default();
        config.tick_rate_ms = 0;
        config.theme = "  ".to_string();
        config.practice_level = 0;
        config.arcade = ArcadeConfig {
            time_limit_secs: 0,
            start_level: 15,
            max_level: 0,
        };
        config.normalize();

        assert_eq!(config.tick_rate_ms, MIN_TICK_RATE_MS);
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.practice_level, 1);
        assert_eq!(config.arcade.time_limit_secs, 60);
        assert_eq!(config.arcade.max_level, 1);
        assert_eq!(config.arcade.start_level, 1);
    }

    #[test]
    fn test_normalize_keeps_start_within_max() {
        let mut arcade = ArcadeConfig {
            time_limit_secs: 30,
            start_level: 7,
            max_level: 5,
        };
        arcade.normalize();
        assert_eq!(arcade.start_level, 5);
        assert_eq!(arcade.time_limit_secs, 30);
    }
}
