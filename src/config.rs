use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const APP_DIR_NAME: &str = "snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board side length in cells.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Default starting snake length.
pub const DEFAULT_INITIAL_LENGTH: usize = 3;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// Tick interval reduction per speed level, in milliseconds.
pub const SPEED_STEP_MS: u64 = 10;

/// Score needed per speed level increase.
pub const POINTS_PER_SPEED_LEVEL: u32 = 50;

/// Default chance that a spawned consumable is a bonus.
pub const DEFAULT_BONUS_PROBABILITY: f64 = 0.1;

/// Tunable engine settings. Every field falls back to its default when
/// missing from a config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub grid_size: u16,
    pub initial_length: usize,
    pub tick_interval_ms: u64,
    pub bonus_probability: f64,
    /// Uneaten bonus food relocates after this many ticks when set.
    pub bonus_lifetime_ticks: Option<u64>,
    /// Shortens the tick interval as the speed level rises.
    pub speed_up: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_length: DEFAULT_INITIAL_LENGTH,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            bonus_probability: DEFAULT_BONUS_PROBABILITY,
            bonus_lifetime_ticks: None,
            speed_up: false,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if given, else the default config file when it exists,
    /// else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_json_file(path);
        }

        let default_path = config_path();
        if default_path.is_file() {
            Self::from_json_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks the settings describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }

        let max_length = self.max_initial_length();
        if self.initial_length == 0 || self.initial_length > max_length {
            return Err(ConfigError::InitialLength {
                length: self.initial_length,
                grid_size: self.grid_size,
                max: max_length,
            });
        }

        if !(0.0..=1.0).contains(&self.bonus_probability) {
            return Err(ConfigError::BonusProbability(self.bonus_probability));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }

    /// Longest snake that fits left of (and including) the centre cell.
    #[must_use]
    pub fn max_initial_length(&self) -> usize {
        usize::from(self.grid_size / 2) + 1
    }

    /// Tick interval for `speed_level` (1-based).
    #[must_use]
    pub fn tick_interval(&self, speed_level: u32) -> Duration {
        if !self.speed_up {
            return Duration::from_millis(self.tick_interval_ms);
        }

        let speed_penalty_ms = u64::from(speed_level.saturating_sub(1)) * SPEED_STEP_MS;
        let clamped_ms = self
            .tick_interval_ms
            .saturating_sub(speed_penalty_ms)
            .max(MIN_TICK_INTERVAL_MS.min(self.tick_interval_ms));
        Duration::from_millis(clamped_ms)
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Speed level for `score`, starting at 1.
#[must_use]
pub fn speed_level_for_score(score: u32) -> u32 {
    1 + score / POINTS_PER_SPEED_LEVEL
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{speed_level_for_score, EngineConfig};
    use crate::error::ConfigError;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "grid_size": 12, "speed_up": true }"#)
                .expect("partial config should parse");

        assert_eq!(config.grid_size, 12);
        assert!(config.speed_up);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.bonus_lifetime_ticks, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "gird_size": 12 }"#).is_err());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let tiny = EngineConfig {
            grid_size: 1,
            ..EngineConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(ConfigError::GridTooSmall(1))));

        let too_long = EngineConfig {
            grid_size: 10,
            initial_length: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ConfigError::InitialLength { max: 6, .. })
        ));

        let odds = EngineConfig {
            bonus_probability: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(odds.validate(), Err(ConfigError::BonusProbability(_))));

        let frozen = EngineConfig {
            tick_interval_ms: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(frozen.validate(), Err(ConfigError::ZeroTickInterval)));
    }

    #[test]
    fn tick_interval_is_fixed_without_speed_up() {
        let config = EngineConfig::default();

        assert_eq!(config.tick_interval(1), Duration::from_millis(150));
        assert_eq!(config.tick_interval(9), Duration::from_millis(150));
    }

    #[test]
    fn speed_up_shortens_interval_down_to_floor() {
        let config = EngineConfig {
            speed_up: true,
            ..EngineConfig::default()
        };

        assert_eq!(config.tick_interval(1), Duration::from_millis(150));
        assert_eq!(config.tick_interval(3), Duration::from_millis(130));
        assert_eq!(config.tick_interval(50), Duration::from_millis(60));
    }

    #[test]
    fn speed_level_steps_every_fifty_points() {
        assert_eq!(speed_level_for_score(0), 1);
        assert_eq!(speed_level_for_score(49), 1);
        assert_eq!(speed_level_for_score(50), 2);
        assert_eq!(speed_level_for_score(125), 3);
    }
}
