//! TOML-based user configuration.
//!
//! Four settings gate the whole system: how often a task fires, how many
//! skips a day allows, how the task difficulty is annotated, and whether
//! the plugin is active at all. The config is read on every prompt and
//! mutated only through the schema-validated [`Config::set`].
//!
//! Stored under the `config.toml` store key. A partially-populated or
//! malformed stored value merges over / degrades to the hard defaults, so
//! `load` always yields a fully valid object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::store::{keys, StateStore};

/// Task difficulty annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Adaptive,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Adaptive => "adaptive",
        }
    }

    /// Annotation appended to every assigned exercise.
    pub fn note(&self) -> &'static str {
        match self {
            Difficulty::Easy => "(Difficulty: EASY - basic implementation, few lines)",
            Difficulty::Medium => "(Difficulty: MEDIUM - consider edge cases and error handling)",
            Difficulty::Hard => {
                "(Difficulty: HARD - robust implementation with tests, types, documentation)"
            }
            Difficulty::Adaptive => "(Difficulty: adapted to the context of the request)",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Qualifying requests between task assignments.
    #[serde(default = "default_frequency")]
    pub frequency: u32,
    /// Skip quota per calendar day.
    #[serde(default = "default_daily_skips")]
    pub daily_skips: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_frequency() -> u32 {
    10
}
fn default_daily_skips() -> u32 {
    3
}
fn default_difficulty() -> Difficulty {
    Difficulty::Adaptive
}
fn default_true() -> bool {
    true
}

const FREQUENCY_RANGE: (u32, u32) = (1, 100);
const DAILY_SKIPS_RANGE: (u32, u32) = (0, 10);

/// The fixed set of settable keys.
pub const VALID_KEYS: &[&str] = &["frequency", "daily_skips", "difficulty", "enabled"];

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            daily_skips: default_daily_skips(),
            difficulty: default_difficulty(),
            enabled: true,
        }
    }
}

impl Config {
    /// Load from the store, merging persisted values over defaults.
    ///
    /// Never fails: a missing or unparseable stored config yields the
    /// defaults, and per-field serde defaults fill any gaps.
    pub fn load(store: &impl StateStore) -> Self {
        let mut cfg: Config = store
            .read(keys::CONFIG)
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default();
        // A hand-edited zero frequency would break the modulo trigger;
        // out-of-schema values count as malformed.
        if cfg.frequency == 0 {
            cfg.frequency = default_frequency();
        }
        cfg
    }

    /// Persist to the store as TOML.
    ///
    /// # Errors
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &impl StateStore) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        store
            .write(keys::CONFIG, &content)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))
    }

    /// Current value of one key as a string, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "frequency" => Some(self.frequency.to_string()),
            "daily_skips" => Some(self.daily_skips.to_string()),
            "difficulty" => Some(self.difficulty.to_string()),
            "enabled" => Some(self.enabled.to_string()),
            _ => None,
        }
    }

    /// Validate and apply one setting, then persist the merged config.
    ///
    /// Returns the applied value as a string.
    ///
    /// # Errors
    /// Rejects unknown keys (listing the valid ones) and out-of-range or
    /// mistyped values with a descriptive message; nothing is persisted
    /// on rejection.
    pub fn set(
        &mut self,
        store: &impl StateStore,
        key: &str,
        value: &str,
    ) -> Result<String, ConfigError> {
        match key {
            "frequency" => self.frequency = parse_ranged(key, value, FREQUENCY_RANGE)?,
            "daily_skips" => self.daily_skips = parse_ranged(key, value, DAILY_SKIPS_RANGE)?,
            "difficulty" => {
                self.difficulty = match value {
                    "easy" => Difficulty::Easy,
                    "medium" => Difficulty::Medium,
                    "hard" => Difficulty::Hard,
                    "adaptive" => Difficulty::Adaptive,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: "must be one of: easy, medium, hard, adaptive".to_string(),
                        })
                    }
                }
            }
            "enabled" => {
                self.enabled = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be: true or false".to_string(),
                })?
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                    valid_keys: VALID_KEYS.to_vec(),
                })
            }
        }
        self.save(store)?;
        Ok(self.get(key).unwrap_or_default())
    }

    /// Per-key descriptions for the CLI help surface.
    pub fn schema() -> Vec<(&'static str, &'static str)> {
        vec![
            ("frequency", "Requests between tasks (1-100)"),
            ("daily_skips", "Max skips per day (0-10)"),
            ("difficulty", "Task difficulty (easy|medium|hard|adaptive)"),
            ("enabled", "Plugin active (true|false)"),
        ]
    }
}

fn parse_ranged(key: &str, value: &str, (min, max): (u32, u32)) -> Result<u32, ConfigError> {
    let n: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: "must be a number".to_string(),
    })?;
    if n < min {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be at least {min}"),
        });
    }
    if n > max {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be at most {max}"),
        });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_when_store_empty() {
        let store = MemoryStore::new();
        let cfg = Config::load(&store);
        assert_eq!(cfg.frequency, 10);
        assert_eq!(cfg.daily_skips, 3);
        assert_eq!(cfg.difficulty, Difficulty::Adaptive);
        assert!(cfg.enabled);
    }

    #[test]
    fn partial_stored_config_merges_over_defaults() {
        let store = MemoryStore::new();
        store.write(keys::CONFIG, "frequency = 3\n").unwrap();
        let cfg = Config::load(&store);
        assert_eq!(cfg.frequency, 3);
        assert_eq!(cfg.daily_skips, 3);
        assert!(cfg.enabled);
    }

    #[test]
    fn malformed_stored_config_degrades_to_defaults() {
        let store = MemoryStore::new();
        store.write(keys::CONFIG, "{{{ not toml").unwrap();
        assert_eq!(Config::load(&store), Config::default());
    }

    #[test]
    fn zero_frequency_is_treated_as_malformed() {
        let store = MemoryStore::new();
        store.write(keys::CONFIG, "frequency = 0\n").unwrap();
        assert_eq!(Config::load(&store).frequency, 10);
    }

    #[test]
    fn set_persists_and_roundtrips() {
        let store = MemoryStore::new();
        let mut cfg = Config::load(&store);
        let applied = cfg.set(&store, "frequency", "5").unwrap();
        assert_eq!(applied, "5");
        assert_eq!(Config::load(&store).frequency, 5);
    }

    #[test]
    fn set_rejects_unknown_key_with_valid_keys() {
        let store = MemoryStore::new();
        let mut cfg = Config::default();
        match cfg.set(&store, "cadence", "5") {
            Err(ConfigError::UnknownKey { valid_keys, .. }) => {
                assert_eq!(valid_keys, VALID_KEYS.to_vec());
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
        // Rejection persists nothing.
        assert!(!store.exists(keys::CONFIG));
    }

    #[test]
    fn set_rejects_out_of_range_numbers() {
        let store = MemoryStore::new();
        let mut cfg = Config::default();
        assert!(cfg.set(&store, "frequency", "0").is_err());
        assert!(cfg.set(&store, "frequency", "101").is_err());
        assert!(cfg.set(&store, "daily_skips", "11").is_err());
        assert!(cfg.set(&store, "frequency", "nope").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_bad_enum_and_bool() {
        let store = MemoryStore::new();
        let mut cfg = Config::default();
        assert!(cfg.set(&store, "difficulty", "impossible").is_err());
        assert!(cfg.set(&store, "enabled", "maybe").is_err());
        let applied = cfg.set(&store, "difficulty", "hard").unwrap();
        assert_eq!(applied, "hard");
        let applied = cfg.set(&store, "enabled", "false").unwrap();
        assert_eq!(applied, "false");
    }

    #[test]
    fn get_covers_every_valid_key() {
        let cfg = Config::default();
        for key in VALID_KEYS {
            assert!(cfg.get(key).is_some(), "missing get for {key}");
        }
        assert!(cfg.get("nope").is_none());
    }
}
