use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TICK_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },
    #[error("{var} must be an unsigned integer, got {value:?}")]
    NotInteger { var: &'static str, value: String },
}

/// Runtime settings, read from `PACMAN_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick: Duration,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub headless_ticks: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
            log_file: None,
            headless_ticks: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tick_ms = positive(&lookup, "PACMAN_TICK_MS")?.unwrap_or(DEFAULT_TICK_MS);
        Ok(Self {
            tick: Duration::from_millis(tick_ms),
            seed: integer(&lookup, "PACMAN_SEED")?,
            log_file: lookup("PACMAN_LOG_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            headless_ticks: positive(&lookup, "PACMAN_HEADLESS_TICKS")?,
        })
    }
}

fn integer(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::NotInteger { var, value })
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match integer(lookup, var) {
        Ok(Some(0)) | Err(ConfigError::NotInteger { .. }) => Err(ConfigError::NotPositive {
            var,
            value: lookup(var).unwrap_or_default(),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("PACMAN_TICK_MS", "70"),
            ("PACMAN_SEED", "12345"),
            ("PACMAN_LOG_FILE", "/tmp/pacman.log"),
            ("PACMAN_HEADLESS_TICKS", "200"),
        ])
        .unwrap();
        assert_eq!(cfg.tick, Duration::from_millis(70));
        assert_eq!(cfg.seed, Some(12345));
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/pacman.log")));
        assert_eq!(cfg.headless_ticks, Some(200));
    }

    #[test]
    fn seed_zero_is_allowed() {
        assert_eq!(config(&[("PACMAN_SEED", "0")]).unwrap().seed, Some(0));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            config(&[("PACMAN_TICK_MS", "0")]),
            Err(ConfigError::NotPositive {
                var: "PACMAN_TICK_MS",
                value: "0".into()
            })
        );
        assert_eq!(
            config(&[("PACMAN_TICK_MS", "fast")]),
            Err(ConfigError::NotPositive {
                var: "PACMAN_TICK_MS",
                value: "fast".into()
            })
        );
        assert_eq!(
            config(&[("PACMAN_SEED", "-3")]),
            Err(ConfigError::NotInteger {
                var: "PACMAN_SEED",
                value: "-3".into()
            })
        );
    }
}
