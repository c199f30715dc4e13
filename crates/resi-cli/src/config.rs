//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$RESI_CONFIG` environment variable
//! 2. `<config dir>/resi/config.toml` (e.g. `~/.config/resi/config.toml`)
//! 3. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use resi_core::{DEFAULT_PRECISION_DIGITS, DEFAULT_VARIABLE};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub estimate: EstimateConfig,
    pub output: OutputConfig,
}

/// Defaults for `resi estimate` when flags are omitted.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    /// Samples per estimate are `10^precision_digits`.
    pub precision_digits: u32,
    pub radius: f64,
    pub variable: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show a progress percentage on stderr.
    pub progress: bool,
    pub format: OutputFormat,
}

// --- Defaults ---

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            precision_digits: DEFAULT_PRECISION_DIGITS,
            radius: 1.0,
            variable: DEFAULT_VARIABLE.into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: true,
            format: OutputFormat::Text,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("RESI_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. Platform config dir
    BaseDirs::new().map(|dirs| dirs.config_dir().join("resi").join("config.toml"))
}

/// Show the active config path (for `resi config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
