//! TOML-based application configuration.
//!
//! Holds user preferences for:
//! - Default prep / workout / end durations
//! - Tick cadence of the run loop
//! - Ring colors per displayed phase
//! - Signal (beep) preferences
//!
//! Configuration is read from `~/.config/duofit/config.toml` and is never
//! written back: timer settings do not outlive the process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::timer::{DisplayPhase, TimerConfig};

/// Default durations, in whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerDefaults {
    #[serde(default = "default_prep")]
    pub prep: u32,
    #[serde(default = "default_workout")]
    pub workout: u32,
    #[serde(default = "default_end")]
    pub end: u32,
}

/// Run loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Ring colors. Read once and handed to the renderer at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_prep_color")]
    pub prep: String,
    #[serde(default = "default_workout_color")]
    pub workout: String,
    #[serde(default = "default_end_color")]
    pub end: String,
    #[serde(default = "default_track_color")]
    pub track: String,
}

/// Signal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on signals.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerDefaults,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub signals: SignalsConfig,
}

// Default functions
fn default_prep() -> u32 {
    10
}
fn default_workout() -> u32 {
    60
}
fn default_end() -> u32 {
    10
}
fn default_interval_ms() -> u64 {
    16
}
fn default_prep_color() -> String {
    "yellowgreen".into()
}
fn default_workout_color() -> String {
    "green".into()
}
fn default_end_color() -> String {
    "orange".into()
}
fn default_track_color() -> String {
    "lightgray".into()
}
fn default_true() -> bool {
    true
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            prep: default_prep(),
            workout: default_workout(),
            end: default_end(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            prep: default_prep_color(),
            workout: default_workout_color(),
            end: default_end_color(),
            track: default_track_color(),
        }
    }
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl Palette {
    pub fn color_for(&self, phase: DisplayPhase) -> &str {
        match phase {
            DisplayPhase::Prep => &self.prep,
            DisplayPhase::Workout => &self.workout,
            DisplayPhase::End => &self.end,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the config file.
    pub fn path() -> PathBuf {
        data_dir().join("config.toml")
    }

    /// Load from the default location, or defaults if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from an explicit path, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML,
    /// or holds values the timer cannot run with.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                source,
            }
            .into()),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let cfg: Config = toml::from_str(content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the run loop cannot work with.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero tick interval.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.ticker.interval_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "ticker.interval_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Durations for a fresh engine.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::from_secs(self.timer.prep, self.timer.workout, self.timer.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.workout, 60);
        assert_eq!(parsed.ticker.interval_ms, 16);
        assert_eq!(parsed.palette, Palette::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::parse("[timer]\nworkout = 45\n", Path::new("mem")).unwrap();
        assert_eq!(cfg.timer.workout, 45);
        assert_eq!(cfg.timer.prep, 10);
        assert!(cfg.signals.bell);
        assert_eq!(cfg.palette.end, "orange");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.end").as_deref(), Some("10"));
        assert_eq!(cfg.get("palette.workout").as_deref(), Some("green"));
        assert_eq!(cfg.get("signals.enabled").as_deref(), Some("true"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Config::parse("[ticker]\ninterval_ms = 0\n", Path::new("mem")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = Config::parse("[timer\nprep = ", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn malformed_file_on_disk_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.timer.prep, 10);
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nprep = 3\nworkout = 20\nend = 5\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer_config(), TimerConfig::from_secs(3, 20, 5));
    }

    #[test]
    fn palette_maps_display_phases() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(DisplayPhase::Prep), "yellowgreen");
        assert_eq!(palette.color_for(DisplayPhase::Workout), "green");
        assert_eq!(palette.color_for(DisplayPhase::End), "orange");
    }
}
