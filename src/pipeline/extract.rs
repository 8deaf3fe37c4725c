use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::cluster::{kmeans, kmeans_lab, Cluster};
use crate::theme::Palette;

pub const DEFAULT_COLORS: usize = 5;
pub const DEFAULT_MAX_WIDTH: u32 = 128;
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 200;
pub const DEFAULT_ROUNDS: usize = 8;

/// Which clustering algorithm builds the palette.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMethod {
    /// Fixed-round k-means in RGB with random initial centroids
    #[default]
    Lloyd,
    /// Hamerly k-means in CIELAB with k-means++ initialization
    Hamerly,
}

/// Knobs for a single extraction call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Number of palette entries to produce.
    pub colors: usize,
    /// Seed for centroid initialization. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Images wider than this are downsampled before sampling.
    pub max_width: u32,
    /// Pixels with alpha below this are ignored.
    pub alpha_threshold: u8,
    /// Lloyd iterations.
    pub rounds: usize,
    pub method: ClusterMethod,
}

impl Default for ExtractOptions {
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

/// Decode raw image bytes in any format the `image` crate understands.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(ExtractError::Decode)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}

/// Shrink `img` to at most `max_width` pixels wide, preserving aspect ratio.
/// Narrower images are returned unchanged.
pub fn downsample(img: &DynamicImage, max_width: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_width || max_width == 0 {
        return img.clone();
    }
    let new_h = ((h as f64 * max_width as f64 / w as f64).round() as u32).max(1);
    img.resize_exact(max_width, new_h, FilterType::Triangle)
}

/// Downsample the image and collect the RGB value of every visible pixel.
///
/// If no pixel reaches the alpha threshold, every pixel is used instead so
/// that fully transparent images still produce a palette.
pub fn sample_pixels(img: &DynamicImage, options: &ExtractOptions) -> Result<Vec<[u8; 3]>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ExtractError::EmptyImage { width, height });
    }

    let small = downsample(img, options.max_width).to_rgba8();
    let visible: Vec<[u8; 3]> = small
        .pixels()
        .filter(|p| p[3] >= options.alpha_threshold)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    debug!(
        width = small.width(),
        height = small.height(),
        visible = visible.len(),
        "sampled pixels"
    );

    if visible.is_empty() {
        debug!("no visible pixels, falling back to all pixels");
        return Ok(small.pixels().map(|p| [p[0], p[1], p[2]]).collect());
    }
    Ok(visible)
}

/// Turn ranked clusters into exactly `k` entries, repeating the last one if short.
fn fit_to_k(clusters: &[Cluster], k: usize) -> Palette {
    let mut colors: Vec<_> = clusters.iter().take(k).map(Cluster::color).collect();
    if let Some(&last) = colors.last() {
        colors.resize(k, last);
    }
    Palette::new(colors)
}

/// Build a palette from an already decoded image.
pub fn palette_from_image(
    img: &DynamicImage,
    options: &ExtractOptions,
    cancel: &CancelToken,
) -> Result<Palette> {
    if options.colors == 0 {
        return Err(ExtractError::InvalidClusterCount(0));
    }
    cancel.check()?;
    let samples = sample_pixels(img, options)?;
    cancel.check()?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let clusters = match options.method {
        ClusterMethod::Lloyd => kmeans(&samples, options.colors, options.rounds, &mut rng, cancel)?,
        ClusterMethod::Hamerly => kmeans_lab(&samples, options.colors, rng.gen(), cancel)?,
    };

    Ok(fit_to_k(&clusters, options.colors))
}

/// Decode `bytes` and extract a palette of exactly `options.colors` entries,
/// most dominant first.
pub fn extract_palette(bytes: &[u8], options: &ExtractOptions) -> Result<Palette> {
    extract_palette_with_cancel(bytes, options, &CancelToken::new())
}

/// [`extract_palette`] that gives up with [`ExtractError::Cancelled`] once
/// `cancel` is tripped.
pub fn extract_palette_with_cancel(
    bytes: &[u8],
    options: &ExtractOptions,
    cancel: &CancelToken,
) -> Result<Palette> {
    let img = decode_image(bytes)?;
    palette_from_image(&img, options, cancel)
}
