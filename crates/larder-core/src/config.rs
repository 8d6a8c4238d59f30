//! On-disk configuration for the store location and sweep behavior.
//!
//! Everything defaults sensibly: a missing config file is not an error,
//! and a partial file only overrides the keys it names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::freshness::DEFAULT_EXPIRING_WINDOW_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LarderConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Where the SQLite database lives. Parent directories are created on
    /// open.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Days before expiry at which items count as expiring soon.
    #[serde(default = "default_expiring_window_days")]
    pub expiring_window_days: u32,
    /// Minutes between scheduled sweeps.
    #[serde(default = "default_cadence_minutes")]
    pub cadence_minutes: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            expiring_window_days: default_expiring_window_days(),
            cadence_minutes: default_cadence_minutes(),
        }
    }
}

impl SweepConfig {
    /// The sweep cadence as a [`Duration`].
    #[must_use]
    pub const fn cadence(&self) -> Duration {
        Duration::from_secs(self.cadence_minutes.saturating_mul(60))
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<LarderConfig> {
    if !path.exists() {
        return Ok(LarderConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<LarderConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_store_path() -> PathBuf {
    PathBuf::from("larder.sqlite3")
}

const fn default_expiring_window_days() -> u32 {
    DEFAULT_EXPIRING_WINDOW_DAYS
}

const fn default_cadence_minutes() -> u64 {
    24 * 60
}
