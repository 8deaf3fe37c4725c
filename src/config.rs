//! Configuration loading.
//!
//! Settings come from a TOML file: an explicit `--config` path, else
//! `<config_dir>/slide-palette/config.toml` when it exists, else built-in
//! defaults. Command-line flags override file values.
//!
//! ```toml
//! [extract]
//! colors = 6
//! seed = 7
//! method = "hamerly"
//!
//! [classify]
//! title_min = 32.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::pipeline::extract::{
    ClusterMethod, ExtractOptions, DEFAULT_ALPHA_THRESHOLD, DEFAULT_COLORS, DEFAULT_MAX_WIDTH,
    DEFAULT_ROUNDS,
};
use crate::template::FontSizeClassifier;

const APP_DIR: &str = "slide-palette";
const CONFIG_FILE: &str = "config.toml";

/// Palette extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub colors: usize,
    pub seed: Option<u64>,
    pub max_width: u32,
    pub alpha_threshold: u8,
    pub rounds: usize,
    pub method: ClusterMethod,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            seed: None,
            max_width: DEFAULT_MAX_WIDTH,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            rounds: DEFAULT_ROUNDS,
            method: ClusterMethod::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub classify: FontSizeClassifier,
}

impl Config {
    /// Default config file location, e.g. `~/.config/slide-palette/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `explicit` if given (it must exist), otherwise from the
    /// default location if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let e = &self.extract;
        ExtractOptions {
            colors: e.colors,
            seed: e.seed,
            max_width: e.max_width,
            alpha_threshold: e.alpha_threshold,
            rounds: e.rounds,
            method: e.method,
        }
    }
}
