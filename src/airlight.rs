//! Atmospheric light (airlight) estimation by recursive quadrant search.
//!
//! The image is split into four quadrants; the one with the highest
//! `Σ_c (mean_c − std_c)` is kept and split again until its area drops to
//! the configured threshold. Bright, flat regions (sky, open water) win.
//! Within the final region the pixel closest to pure white is the airlight.

use crate::block::Block;
use crate::error::RestoreError;
use crate::image::MultiImageF32;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Search parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AirlightOptions {
    /// Stop splitting once a region covers at most this many pixels.
    pub block_area: usize,
}

impl Default for AirlightOptions {
    fn default() -> Self {
        Self { block_area: 10_000 }
    }
}

/// Estimated airlight, one value per channel, in the image's sample range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Airlight {
    pub values: Vec<f32>,
    /// Region the search terminated in.
    pub region: Block,
}

/// Estimate the airlight of `image`, searching down to regions of at most
/// `block_size_threshold` pixels.
pub fn estimate_airlight(
    image: &MultiImageF32,
    block_size_threshold: usize,
) -> Result<Airlight, RestoreError> {
    if image.is_empty() {
        return Err(RestoreError::invalid("image", "zero-area image"));
    }
    if block_size_threshold == 0 {
        return Err(RestoreError::invalid(
            "block size threshold",
            "must be > 0",
        ));
    }
    let t0 = Instant::now();

    let mut region = Block::full(image.w, image.h);
    let mut depth = 0usize;
    while region.area() > block_size_threshold {
        if region.area() <= 1 {
            break;
        }
        let mut best = region;
        let mut best_score = f64::NEG_INFINITY;
        // Thin regions split along their long axis only; empty halves sit out.
        for quad in region.quadrants().into_iter().filter(|q| q.area() > 0) {
            let score = region_score(image, &quad);
            if score > best_score {
                best_score = score;
                best = quad;
            }
        }
        region = best;
        depth += 1;
    }

    let values = whitest_pixel(image, &region);
    debug!(
        "airlight: {}x{} threshold={} depth={} region={:?} -> {:?} ({:.3} ms)",
        image.w,
        image.h,
        block_size_threshold,
        depth,
        region,
        values,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Airlight { values, region })
}

/// `Σ_c (mean_c − std_c)` with the population standard deviation.
fn region_score(image: &MultiImageF32, block: &Block) -> f64 {
    let ch = image.channels;
    let mut sum = vec![0.0f64; ch];
    let mut sum_sq = vec![0.0f64; ch];
    for y in block.row_start..block.row_end {
        for x in block.col_start..block.col_end {
            for (c, &v) in image.pixel(x, y).iter().enumerate() {
                let v = v as f64;
                sum[c] += v;
                sum_sq[c] += v * v;
            }
        }
    }
    let n = block.area() as f64;
    sum.iter()
        .zip(&sum_sq)
        .map(|(&s, &sq)| {
            let mean = s / n;
            let var = (sq / n - mean * mean).max(0.0);
            mean - var.sqrt()
        })
        .sum()
}

/// Pixel with the smallest Euclidean distance to `(255, …, 255)`; the
/// first one in row-major order wins ties.
fn whitest_pixel(image: &MultiImageF32, block: &Block) -> Vec<f32> {
    let mut best = (block.col_start, block.row_start);
    let mut best_dist = f64::INFINITY;
    for y in block.row_start..block.row_end {
        for x in block.col_start..block.col_end {
            let dist: f64 = image
                .pixel(x, y)
                .iter()
                .map(|&v| {
                    let d = 255.0 - v as f64;
                    d * d
                })
                .sum();
            if dist < best_dist {
                best_dist = dist;
                best = (x, y);
            }
        }
    }
    image.pixel(best.0, best.1).to_vec()
}
