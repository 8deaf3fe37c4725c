//! Image → palette pipeline: decode, sample, cluster, rank.

pub mod cancel;
pub mod cluster;
pub mod extract;

pub use cancel::CancelToken;
pub use extract::{extract_palette, extract_palette_with_cancel, ClusterMethod, ExtractOptions};
