//! Binary settings read from the environment, and tracing setup.
//!
//! Environment variables:
//!
//! - `TETRIS_CONFIG`: path to a JSON [`EngineConfig`] (missing keys take defaults)
//! - `TETRIS_WIDTH` / `TETRIS_HEIGHT`: board size, applied over the file
//! - `TETRIS_SEED`: seed for the environment's episode chain
//! - `TETRIS_LOG`: `EnvFilter` directives (default `info`)
//! - `TETRIS_LOG_PATH`: file that receives log output

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::EngineConfig;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub seed: Option<u64>,
    pub log_filter: String,
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (tests pass a map).
    ///
    /// Blank values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut engine = match get("TETRIS_CONFIG") {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading TETRIS_CONFIG file {path}"))?;
                EngineConfig::from_json(&text).with_context(|| format!("in {path}"))?
            }
            None => EngineConfig::default(),
        };

        if let Some(width) = get("TETRIS_WIDTH") {
            engine.width = width
                .parse()
                .with_context(|| format!("invalid TETRIS_WIDTH {width:?}"))?;
        }
        if let Some(height) = get("TETRIS_HEIGHT") {
            engine.height = height
                .parse()
                .with_context(|| format!("invalid TETRIS_HEIGHT {height:?}"))?;
        }
        engine.validate()?;

        let seed = match get("TETRIS_SEED") {
            Some(seed) => Some(
                seed.parse()
                    .with_context(|| format!("invalid TETRIS_SEED {seed:?}"))?,
            ),
            None => None,
        };

        Ok(Self {
            engine,
            seed,
            log_filter: get("TETRIS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_path: get("TETRIS_LOG_PATH").map(PathBuf::from),
        })
    }
}

/// Where log lines may go when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Only the configured file; stdout/stderr belong to the terminal UI.
    FileOnly,
    /// Fall back to stderr when `TETRIS_LOG` was given.
    FileOrStderr,
}

/// Install the global subscriber. Returns `false` when logging stays off.
pub fn init_tracing(settings: &Settings, target: LogTarget) -> Result<bool> {
    let filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid TETRIS_LOG {:?}", settings.log_filter))?;

    match (&settings.log_path, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(filter)
                .try_init()?;
        }
        (None, LogTarget::FileOrStderr) if std::env::var_os("TETRIS_LOG").is_some() => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(filter)
                .try_init()?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_size_seed_and_logging() {
        let settings = Settings::from_lookup(lookup(&[
            ("TETRIS_WIDTH", "12"),
            ("TETRIS_HEIGHT", " 24 "),
            ("TETRIS_SEED", "42"),
            ("TETRIS_LOG", "debug"),
            ("TETRIS_LOG_PATH", "/tmp/tetris.log"),
        ]))
        .unwrap();
        assert_eq!((settings.engine.width, settings.engine.height), (12, 24));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.log_path, Some(PathBuf::from("/tmp/tetris.log")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let settings =
            Settings::from_lookup(lookup(&[("TETRIS_SEED", "  "), ("TETRIS_LOG_PATH", "")]))
                .unwrap();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.log_path, None);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(Settings::from_lookup(lookup(&[("TETRIS_SEED", "abc")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("TETRIS_WIDTH", "-1")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("TETRIS_HEIGHT", "2")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("TETRIS_CONFIG", "/nonexistent/x.json")])).is_err());
    }
}
