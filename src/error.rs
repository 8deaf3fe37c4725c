//! Error types for palette extraction and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single palette extraction call.
///
/// Every variant is terminal for that call; nothing here is retried.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input bytes could not be decoded into a bitmap.
    #[error("unsupported or corrupt image: {0}")]
    Decode(#[source] image::ImageError),

    /// The image decoded but has no pixel surface to sample.
    #[error("image has no pixels to sample ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("cluster count must be at least 1, got {0}")]
    InvalidClusterCount(usize),

    #[error("palette extraction was cancelled")]
    Cancelled,

    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Failures while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
