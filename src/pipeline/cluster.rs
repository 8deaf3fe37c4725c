use std::collections::HashSet;

use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;
use rand::Rng;
use tracing::debug;

use crate::color::Color;
use crate::error::ExtractError;
use crate::pipeline::cancel::CancelToken;

const HAMERLY_MAX_ITER: usize = 20;
const HAMERLY_CONVERGE: f32 = 5.0;

/// One finished cluster: its mean color and how many samples it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub centroid: [f32; 3],
    pub count: usize,
}

impl Cluster {
    pub fn color(&self) -> Color {
        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Color::new(
            channel(self.centroid[0]),
            channel(self.centroid[1]),
            channel(self.centroid[2]),
        )
    }
}

fn distance_sq(p: [u8; 3], c: &[f32; 3]) -> f32 {
    let dr = p[0] as f32 - c[0];
    let dg = p[1] as f32 - c[1];
    let db = p[2] as f32 - c[2];
    dr * dr + dg * dg + db * db
}

fn nearest(p: [u8; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Lloyd's k-means over RGB samples with a fixed number of rounds.
///
/// Centroids start at `k` samples drawn uniformly (with replacement) from
/// `samples`. A centroid that receives no samples in a round keeps its
/// position. Clusters come back ranked by member count, largest first;
/// equal counts keep their centroid order.
pub fn kmeans<R: Rng + ?Sized>(
    samples: &[[u8; 3]],
    k: usize,
    rounds: usize,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Vec<Cluster>, ExtractError> {
    if k == 0 {
        return Err(ExtractError::InvalidClusterCount(k));
    }
    if samples.is_empty() {
        return Err(ExtractError::EmptyImage {
            width: 0,
            height: 0,
        });
    }

    let mut centroids: Vec<[f32; 3]> = (0..k)
        .map(|_| {
            let p = samples[rng.gen_range(0..samples.len())];
            [p[0] as f32, p[1] as f32, p[2] as f32]
        })
        .collect();

    let mut counts = vec![0usize; k];
    // With zero rounds the samples are still assigned once so the ranking
    // reflects the initial centroids.
    for round in 0..rounds.max(1) {
        cancel.check()?;

        let mut sums = vec![[0f64; 3]; k];
        counts.iter_mut().for_each(|c| *c = 0);
        for &p in samples {
            let idx = nearest(p, &centroids);
            counts[idx] += 1;
            for ch in 0..3 {
                sums[idx][ch] += p[ch] as f64;
            }
        }

        if round < rounds {
            for (i, centroid) in centroids.iter_mut().enumerate() {
                if counts[i] == 0 {
                    continue;
                }
                let n = counts[i] as f64;
                *centroid = [
                    (sums[i][0] / n) as f32,
                    (sums[i][1] / n) as f32,
                    (sums[i][2] / n) as f32,
                ];
            }
        }
    }

    let mut clusters: Vec<Cluster> = centroids
        .into_iter()
        .zip(counts)
        .map(|(centroid, count)| Cluster { centroid, count })
        .collect();
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        samples = samples.len(),
        k,
        rounds,
        sizes = ?clusters.iter().map(|c| c.count).collect::<Vec<_>>(),
        "lloyd clustering finished"
    );
    Ok(clusters)
}

/// Perceptual k-means in CIELAB using Hamerly's algorithm (k-means++ init).
///
/// `k` is capped at the number of distinct samples, so the result may hold
/// fewer than `k` clusters. Ranking matches [`kmeans`].
pub fn kmeans_lab(
    samples: &[[u8; 3]],
    k: usize,
    seed: u64,
    cancel: &CancelToken,
) -> Result<Vec<Cluster>, ExtractError> {
    if k == 0 {
        return Err(ExtractError::InvalidClusterCount(k));
    }
    if samples.is_empty() {
        return Err(ExtractError::EmptyImage {
            width: 0,
            height: 0,
        });
    }
    cancel.check()?;

    let distinct = samples.iter().collect::<HashSet<_>>().len();
    // Cluster indices are stored as u8 by kmeans_colors.
    let k_eff = k.min(distinct).min(u8::MAX as usize);

    let labs: Vec<Lab> = samples.iter().map(|&p| Color::from_rgb(p).to_lab()).collect();
    let result = get_kmeans_hamerly(
        k_eff,
        HAMERLY_MAX_ITER,
        HAMERLY_CONVERGE,
        false,
        &labs,
        seed,
    );
    cancel.check()?;

    let mut counts = vec![0usize; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut clusters: Vec<Cluster> = result
        .centroids
        .iter()
        .zip(counts)
        .map(|(lab, count)| {
            let c = Color::from_lab(*lab);
            Cluster {
                centroid: [c.r as f32, c.g as f32, c.b as f32],
                count,
            }
        })
        .collect();
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        samples = samples.len(),
        k = k_eff,
        sizes = ?clusters.iter().map(|c| c.count).collect::<Vec<_>>(),
        "hamerly clustering finished"
    );
    Ok(clusters)
}
