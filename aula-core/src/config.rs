//! User configuration.
//!
//! Loaded from `~/.config/aula/config.toml`. Every field is optional
//! and a missing file just means defaults, so first runs need no setup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::constants::{DEFAULT_WINDOW_DAYS, SCHEDULE_TTL};
use crate::error::ConfigError;
use crate::schedule::ScheduleOptions;

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

#[derive(Deserialize, Clone, Debug)]
pub struct AulaConfig {
    /// Days shown around the focused date.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Schedule freshness in humantime form ("10m", "90s").
    #[serde(default)]
    pub cache_ttl: Option<String>,

    /// Subject name to hex color overrides, consulted before the
    /// built-in palette.
    #[serde(default)]
    pub subject_colors: HashMap<String, String>,
}

impl Default for AulaConfig {
    fn default() -> Self {
        AulaConfig {
            window_days: DEFAULT_WINDOW_DAYS,
            cache_ttl: None,
            subject_colors: HashMap::new(),
        }
    }
}

impl AulaConfig {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("aula");

        Ok(config_dir.join("config.toml"))
    }

    /// Load `~/.config/aula/config.toml`, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AulaConfig::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let config: AulaConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        // Validate the TTL now so a typo surfaces at load time instead
        // of on the first schedule fetch.
        config.ttl()?;
        Ok(config)
    }

    /// The configured cache TTL, ten minutes when unset.
    pub fn ttl(&self) -> Result<Duration, ConfigError> {
        match &self.cache_ttl {
            Some(raw) => humantime::parse_duration(raw)
                .map_err(|e| ConfigError::Invalid(format!("cache_ttl: {e}"))),
            None => Ok(SCHEDULE_TTL),
        }
    }

    /// Schedule service options with this config applied.
    pub fn schedule_options(&self) -> Result<ScheduleOptions, ConfigError> {
        Ok(ScheduleOptions {
            window_days: self.window_days,
            ttl: self.ttl()?,
            subject_colors: self.subject_colors.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses_into_options() {
        let config = AulaConfig::parse(
            r##"
window_days = 7
cache_ttl = "90s"

[subject_colors]
"Física" = "#123456"
"##,
        )
        .expect("Should parse the config");

        let options = config
            .schedule_options()
            .expect("Should build schedule options");
        assert_eq!(options.window_days, 7);
        assert_eq!(options.ttl, Duration::from_secs(90));
        assert_eq!(
            options.subject_colors.get("Física").map(String::as_str),
            Some("#123456")
        );
    }

    #[test]
    fn test_empty_config_means_defaults() {
        let config = AulaConfig::parse("").expect("Should accept an empty file");
        assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(config.ttl().expect("Should default the TTL"), SCHEDULE_TTL);
        assert!(config.subject_colors.is_empty());
    }

    #[test]
    fn test_bad_ttl_is_rejected_at_parse_time() {
        let err = AulaConfig::parse(r#"cache_ttl = "tomorrow""#)
            .expect_err("Should reject an unparseable duration");
        assert!(err.to_string().contains("cache_ttl"));
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = AulaConfig::load_from(Path::new("/nonexistent/aula/config.toml"))
            .expect("Should fall back to defaults");
        assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
    }
}
