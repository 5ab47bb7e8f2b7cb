//! Engine settings loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Base delay between encounters.
    pub pacing_interval: Duration,
    /// Directory for the JSON persistence store.
    pub save_dir: PathBuf,
    /// Directory holding `monsters.json` and `bosses.json`.
    pub data_dir: PathBuf,
}

impl EngineSettings {
    pub const DEFAULT_PACING_MS: u64 = 800;

    /// Reads `DELVE_PACING_MS`, `DELVE_SAVE_DIR` and `DELVE_DATA_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Invalid values fall back to
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let pacing_ms = match lookup("DELVE_PACING_MS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid DELVE_PACING_MS, using default");
                Self::DEFAULT_PACING_MS
            }),
            None => Self::DEFAULT_PACING_MS,
        };

        Self {
            pacing_interval: Duration::from_millis(pacing_ms),
            save_dir: lookup("DELVE_SAVE_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.save_dir),
            data_dir: lookup("DELVE_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pacing_interval: Duration::from_millis(Self::DEFAULT_PACING_MS),
            save_dir: PathBuf::from("./save"),
            data_dir: PathBuf::from("./data"),
        }
    }
}
