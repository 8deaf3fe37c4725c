//! Palette extraction and slide template recoloring.
//!
//! - [`pipeline`]: image bytes → ranked palette of `k` colors (k-means).
//! - [`template`]: slide template model, color-role classification and
//!   positional recoloring onto a palette.

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod template;
pub mod theme;

pub use color::Color;
pub use error::{ConfigError, ExtractError};
pub use pipeline::{extract_palette, CancelToken, ClusterMethod, ExtractOptions};
pub use template::{extract_color_system, recolor, ColorSystem, SlideTemplate};
pub use theme::Palette;
