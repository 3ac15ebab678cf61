//! Block-wise transmission estimation.
//!
//! The image is tiled into `patch_size × patch_size` blocks. For every block
//! the candidates `t_k = t0 + 0.1·k` are scored with [`block_cost`] and the
//! earliest strictly-cheapest one fills the block. The resulting map is
//! piecewise constant; [`refine_transmission`] turns it into a smooth,
//! edge-following map.
//!
//! The raw map is never clamped. Keep it away from zero before dividing by it
//! (see [`crate::dehaze::recover_radiance`]).

mod cost;
pub mod options;
mod refine;

pub use cost::{block_cost, block_cost_single};

use cost::interleaved_cost;
pub use options::{RefineOptions, TransmissionOptions};
pub use refine::refine_transmission;

use crate::block::Block;
use crate::error::RestoreError;
use crate::image::{ImageF32, MultiImageF32};
use log::debug;
use std::time::Instant;

const T_STEP: f64 = 0.1;

/// Number of candidates searched from `initial_t`:
/// `floor((1 − initial_t) · 10)`, never negative.
///
/// The small bias keeps `1 − 0.9` (which is `0.0999…` in binary) at one step.
pub fn search_steps(initial_t: f64) -> usize {
    let steps = ((1.0 - initial_t) / T_STEP + 1e-9).floor();
    if steps > 0.0 {
        steps as usize
    } else {
        0
    }
}

/// Estimate a transmission map for `image` under `airlight`.
///
/// With `options.refine` set, the blocky map is passed through
/// [`refine_transmission`] before being returned.
pub fn estimate_transmission(
    image: &MultiImageF32,
    airlight: &[f32],
    options: &TransmissionOptions,
) -> Result<ImageF32, RestoreError> {
    validate(image.w, image.h, options)?;
    if airlight.len() != image.channels {
        return Err(RestoreError::invalid(
            "airlight",
            format!(
                "{} values for a {}-channel image",
                airlight.len(),
                image.channels
            ),
        ));
    }
    let t0 = Instant::now();
    let map = search_map(
        image.w,
        image.h,
        options,
        |block| image.crop(block),
        |tile: &MultiImageF32, t| interleaved_cost(&tile.data, airlight, options.lambda, t),
    );
    debug!(
        "transmission: {}x{}x{} patch={} lambda={} t0={} took {:.3} ms",
        image.w,
        image.h,
        image.channels,
        options.patch_size,
        options.lambda,
        options.initial_transmission,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    match &options.refine {
        Some(refine) => refine_transmission(image, &map, refine),
        None => Ok(map),
    }
}

/// Same search on a single channel with a scalar airlight.
///
/// Refinement, when requested, uses the channel itself as guidance.
pub fn estimate_transmission_per_channel(
    channel: &ImageF32,
    airlight: f32,
    options: &TransmissionOptions,
) -> Result<ImageF32, RestoreError> {
    validate(channel.w, channel.h, options)?;
    let map = search_map(
        channel.w,
        channel.h,
        options,
        |block| crop_plane(channel, block),
        |tile: &ImageF32, t| interleaved_cost(&tile.data, &[airlight], options.lambda, t),
    );
    match &options.refine {
        Some(refine) => refine_transmission(&MultiImageF32::from(channel.clone()), &map, refine),
        None => Ok(map),
    }
}

fn validate(w: usize, h: usize, options: &TransmissionOptions) -> Result<(), RestoreError> {
    if w == 0 || h == 0 {
        return Err(RestoreError::invalid("image", "zero-area image"));
    }
    if options.patch_size == 0 {
        return Err(RestoreError::invalid("patch size", "must be > 0"));
    }
    if !(options.initial_transmission > 0.0) {
        return Err(RestoreError::invalid(
            "initial transmission",
            format!("{} must be > 0", options.initial_transmission),
        ));
    }
    Ok(())
}

/// Run the candidate search over all tiles and paint the winners.
///
/// `crop` runs once per tile; `cost` scores one candidate on the cropped tile.
fn search_map<T, P, C>(
    w: usize,
    h: usize,
    options: &TransmissionOptions,
    crop: P,
    cost: C,
) -> ImageF32
where
    P: Fn(&Block) -> T + Sync,
    C: Fn(&T, f64) -> f64 + Sync,
{
    let t_init = options.initial_transmission;
    let steps = search_steps(t_init);
    if steps == 0 {
        return ImageF32::filled(w, h, t_init as f32);
    }
    let patch = options.patch_size;
    let best_in_row = |row: usize| -> Vec<(Block, f32)> {
        Block::tile_row(w, h, row, patch)
            .into_iter()
            .map(|block| {
                let tile = crop(&block);
                (block, best_candidate(&tile, t_init, steps, &cost))
            })
            .collect()
    };

    let rows: Vec<usize> = (0..h).step_by(patch).collect();
    #[cfg(feature = "parallel")]
    let winners: Vec<Vec<(Block, f32)>> = {
        use rayon::prelude::*;
        rows.par_iter().map(|&row| best_in_row(row)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let winners: Vec<Vec<(Block, f32)>> = rows.iter().map(|&row| best_in_row(row)).collect();

    let mut map = ImageF32::new(w, h);
    for (block, t) in winners.into_iter().flatten() {
        for y in block.row_start..block.row_end {
            let start = map.idx(block.col_start, y);
            map.data[start..start + block.cols()].fill(t);
        }
    }
    map
}

fn best_candidate<T, C>(tile: &T, t_init: f64, steps: usize, cost: &C) -> f32
where
    C: Fn(&T, f64) -> f64,
{
    let mut best_t = t_init;
    let mut best_cost = f64::INFINITY;
    for k in 0..steps {
        let t = t_init + T_STEP * k as f64;
        let c = cost(tile, t);
        if c < best_cost {
            best_cost = c;
            best_t = t;
        }
    }
    best_t as f32
}

fn crop_plane(img: &ImageF32, block: &Block) -> ImageF32 {
    let mut data = Vec::with_capacity(block.area());
    for y in block.row_start..block.row_end {
        let start = img.idx(block.col_start, y);
        data.extend_from_slice(&img.data[start..start + block.cols()]);
    }
    ImageF32 {
        w: block.cols(),
        h: block.rows(),
        stride: block.cols(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One 2×2 checker tile per entry: samples alternate between `255 − x`
    /// and 255, so against a white airlight the cost is minimal at
    /// `t = x / 255`.
    fn analytic_tiles(depths: &[f32]) -> MultiImageF32 {
        let mut img = MultiImageF32::new(2 * depths.len(), 2, 3);
        for (i, &x) in depths.iter().enumerate() {
            for dy in 0..2 {
                for dx in 0..2 {
                    let v = if (dx + dy) % 2 == 0 { 255.0 - x } else { 255.0 };
                    img.pixel_mut(2 * i + dx, dy).fill(v);
                }
            }
        }
        img
    }

    #[test]
    fn each_tile_is_cropped_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let img = analytic_tiles(&[102.0, 153.0, 204.0]);
        let opts = TransmissionOptions::new(2, 10.0, 0.3);
        let crops = AtomicUsize::new(0);
        let scored = AtomicUsize::new(0);
        let map = search_map(
            img.w,
            img.h,
            &opts,
            |block| {
                crops.fetch_add(1, Ordering::Relaxed);
                img.crop(block)
            },
            |tile: &MultiImageF32, t| {
                scored.fetch_add(1, Ordering::Relaxed);
                interleaved_cost(&tile.data, &[255.0; 3], opts.lambda, t)
            },
        );
        assert_eq!(crops.load(Ordering::Relaxed), 3);
        assert_eq!(scored.load(Ordering::Relaxed), 3 * search_steps(0.3));
        assert!((map.get(0, 0) - 0.4).abs() < 0.05);
    }

    #[test]
    fn step_rule_counts_candidates() {
        assert_eq!(search_steps(0.3), 7);
        assert_eq!(search_steps(0.9), 1);
        assert_eq!(search_steps(0.1), 9);
        assert_eq!(search_steps(1.0), 0);
        assert_eq!(search_steps(1.5), 0);
    }

    #[test]
    fn recovers_analytic_block_optimum() {
        let depths = [102.0, 153.0, 204.0, 229.5];
        let expected = [0.4, 0.6, 0.8, 0.9];
        let img = analytic_tiles(&depths);
        let opts = TransmissionOptions::new(2, 10.0, 0.3);
        let map = estimate_transmission(&img, &[255.0; 3], &opts).unwrap();
        for (i, &t) in expected.iter().enumerate() {
            for dy in 0..2 {
                for dx in 0..2 {
                    let got = map.get(2 * i + dx, dy);
                    assert!((got - t).abs() < 0.05, "tile {i}: got {got}, want {t}");
                }
            }
        }
    }

    #[test]
    fn initial_t_at_or_above_one_fills_map() {
        let img = analytic_tiles(&[100.0, 10.0]);
        let opts = TransmissionOptions::new(2, 10.0, 1.0);
        let map = estimate_transmission(&img, &[255.0; 3], &opts).unwrap();
        assert!(map.data.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn ties_keep_the_earliest_candidate() {
        let img = MultiImageF32::from_pixel(9, 7, &[180.0, 180.0, 180.0]);
        let opts = TransmissionOptions::new(4, 5.0, 0.2);
        let map = estimate_transmission(&img, &[180.0; 3], &opts).unwrap();
        assert!(map.data.iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn patch_larger_than_image_is_one_block() {
        let img = analytic_tiles(&[153.0]);
        let opts = TransmissionOptions::new(64, 10.0, 0.3);
        let map = estimate_transmission(&img, &[255.0; 3], &opts).unwrap();
        assert!(map.data.iter().all(|&v| (v - 0.6).abs() < 0.05));
    }

    #[test]
    fn per_channel_matches_replicated_multi_channel() {
        let img = analytic_tiles(&[102.0, 204.0]);
        let opts = TransmissionOptions::new(2, 10.0, 0.3);
        let multi = estimate_transmission(&img, &[255.0; 3], &opts).unwrap();
        let single = estimate_transmission_per_channel(&img.channel(0), 255.0, &opts).unwrap();
        assert_eq!(multi, single);
    }

    #[test]
    fn rejects_invalid_arguments() {
        let img = MultiImageF32::from_pixel(4, 4, &[1.0, 2.0, 3.0]);
        let a = [255.0; 3];
        let bad = [
            TransmissionOptions::new(0, 5.0, 0.3),
            TransmissionOptions::new(2, 5.0, 0.0),
            TransmissionOptions::new(2, 5.0, 0.3).with_refine(RefineOptions::new(0, 1e-3, 1.0)),
            TransmissionOptions::new(2, 5.0, 0.3).with_refine(RefineOptions::new(4, 0.0, 1.0)),
        ];
        for opts in &bad {
            assert!(
                matches!(
                    estimate_transmission(&img, &a, opts),
                    Err(RestoreError::InvalidArgument { .. })
                ),
                "{opts:?}"
            );
        }
        assert!(estimate_transmission(&img, &[255.0; 2], &TransmissionOptions::default()).is_err());
        assert!(estimate_transmission(
            &MultiImageF32::new(0, 0, 3),
            &a,
            &TransmissionOptions::default()
        )
        .is_err());
    }
}
