//! Engine configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `IRONLOG_*` environment variables. See [`ConfigLoader`].

mod loader;

pub use loader::{default_config_path, ConfigLoader};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkoutError};
use crate::scoring::STANDARD_PLATES;
use crate::storage::{BackendType, StorageConfig};

fn default_commit_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_write_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_tick_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_rest_seconds() -> u32 {
    90
}

fn default_rest_extension_seconds() -> u32 {
    30
}

fn default_bar_weight() -> f64 {
    20.0
}

fn default_plates() -> Vec<f64> {
    STANDARD_PLATES.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on the workout header write during finish
    #[serde(default = "default_commit_timeout", with = "humantime_serde")]
    pub commit_timeout: Duration,

    /// Upper bound on each exercise header and set batch write
    #[serde(default = "default_write_timeout", with = "humantime_serde")]
    pub write_timeout: Duration,

    #[serde(default = "default_rest_seconds")]
    pub default_rest_seconds: u32,

    /// Seconds added by "+30s" style rest extension
    #[serde(default = "default_rest_extension_seconds")]
    pub rest_extension_seconds: u32,

    #[serde(default = "default_bar_weight")]
    pub bar_weight: f64,

    /// Plate denominations, largest first
    #[serde(default = "default_plates")]
    pub plates: Vec<f64>,

    /// How often the timer driver ticks the clocks
    #[serde(default = "default_tick_interval", with = "humantime_serde")]
    pub tick_interval: Duration,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_timeout: default_commit_timeout(),
            write_timeout: default_write_timeout(),
            default_rest_seconds: default_rest_seconds(),
            rest_extension_seconds: default_rest_extension_seconds(),
            bar_weight: default_bar_weight(),
            plates: default_plates(),
            tick_interval: default_tick_interval(),
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Apply `IRONLOG_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup("IRONLOG_COMMIT_TIMEOUT_SECS") {
            let secs: u64 = parse_env("IRONLOG_COMMIT_TIMEOUT_SECS", &secs)?;
            self.commit_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("IRONLOG_REST_SECONDS") {
            self.default_rest_seconds = parse_env("IRONLOG_REST_SECONDS", &secs)?;
        }

        if let Some(weight) = lookup("IRONLOG_BAR_WEIGHT") {
            self.bar_weight = parse_env("IRONLOG_BAR_WEIGHT", &weight)?;
        }

        if let Some(backend) = lookup("IRONLOG_STORAGE_TYPE") {
            self.storage.backend = backend.parse::<BackendType>().map_err(WorkoutError::Config)?;
        }

        if let Some(dir) = lookup("IRONLOG_STORAGE_DIR") {
            self.storage.base_dir = dir.into();
        }

        Ok(())
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.commit_timeout.is_zero() {
            return Err(WorkoutError::Config(
                "commit_timeout must be greater than zero".to_string(),
            ));
        }
        if self.write_timeout.is_zero() {
            return Err(WorkoutError::Config(
                "write_timeout must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(WorkoutError::Config(
                "tick_interval must be greater than zero".to_string(),
            ));
        }
        if self.plates.is_empty() {
            return Err(WorkoutError::Config("plates must not be empty".to_string()));
        }
        if let Some(bad) = self.plates.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            return Err(WorkoutError::Config(format!(
                "plate weights must be positive, got {bad}"
            )));
        }
        if let Some(pair) = self.plates.windows(2).find(|pair| pair[0] <= pair[1]) {
            return Err(WorkoutError::Config(format!(
                "plates must be listed heaviest first, got {} before {}",
                pair[0], pair[1]
            )));
        }
        if !self.bar_weight.is_finite() || self.bar_weight < 0.0 {
            return Err(WorkoutError::Config(format!(
                "bar_weight must be a non-negative number, got {}",
                self.bar_weight
            )));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WorkoutError::Config(format!("invalid {key} '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.commit_timeout, Duration::from_secs(30));
        assert_eq!(config.default_rest_seconds, 90);
        assert_eq!(config.rest_extension_seconds, 30);
        assert_eq!(config.bar_weight, 20.0);
        assert_eq!(config.plates, vec![25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_with_humantime() {
        let config: EngineConfig = toml::from_str(
            r#"
commit_timeout = "10s"
tick_interval = "500ms"
default_rest_seconds = 120
plates = [20.0, 10.0, 5.0]

[storage]
backend = "memory"
"#,
        )
        .unwrap();

        assert_eq!(config.commit_timeout, Duration::from_secs(10));
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert_eq!(config.default_rest_seconds, 120);
        assert_eq!(config.write_timeout, Duration::from_secs(30));
        assert_eq!(config.plates, vec![20.0, 10.0, 5.0]);
        assert_eq!(config.storage.backend, BackendType::Memory);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config
            .apply_env_overrides(lookup_from(&[
                ("IRONLOG_COMMIT_TIMEOUT_SECS", "5"),
                ("IRONLOG_REST_SECONDS", "60"),
                ("IRONLOG_BAR_WEIGHT", "15"),
                ("IRONLOG_STORAGE_TYPE", "memory"),
                ("IRONLOG_STORAGE_DIR", "/tmp/ironlog"),
            ]))
            .unwrap();

        assert_eq!(config.commit_timeout, Duration::from_secs(5));
        assert_eq!(config.default_rest_seconds, 60);
        assert_eq!(config.bar_weight, 15.0);
        assert_eq!(config.storage.backend, BackendType::Memory);
        assert_eq!(config.storage.base_dir, std::path::PathBuf::from("/tmp/ironlog"));
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_env_overrides(lookup_from(&[("IRONLOG_REST_SECONDS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, WorkoutError::Config(msg) if msg.contains("IRONLOG_REST_SECONDS")));

        let err = config
            .apply_env_overrides(lookup_from(&[("IRONLOG_STORAGE_TYPE", "redis")]))
            .unwrap_err();
        assert!(matches!(err, WorkoutError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EngineConfig {
            plates: vec![],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            plates: vec![20.0, 0.0],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            commit_timeout: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            bar_weight: f64::INFINITY,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_heaviest_plates_first() {
        let mut ascending = STANDARD_PLATES.to_vec();
        ascending.reverse();
        let config = EngineConfig {
            plates: ascending,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("heaviest first"));

        let config = EngineConfig {
            plates: vec![20.0, 20.0, 10.0],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            plates: vec![20.0, 10.0, 5.0],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
