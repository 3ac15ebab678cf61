//! Cost of one candidate transmission for one block.
//!
//! The block is dehazed with the candidate `t`:
//! `out = ((in − A)·(128 / t) + 128·A) / 128`, then scored as
//!
//! `cost = lambda · loss / N − (mean(out²) − mean(out)²)`
//!
//! where `loss` sums the squared excursions of `out` outside `[0, 255]` and
//! `N` counts samples (pixels × channels). Low `t` boosts contrast (larger
//! variance) until too many samples clip.

use crate::error::RestoreError;
use crate::image::{ImageF32, MultiImageF32};

/// Cost of candidate `t` on a multi-channel block. `airlight` holds one value
/// per channel.
pub fn block_cost(
    block: &MultiImageF32,
    airlight: &[f32],
    lambda: f64,
    t: f64,
) -> Result<f64, RestoreError> {
    validate(block.is_empty(), block.channels, airlight.len(), t)?;
    Ok(interleaved_cost(&block.data, airlight, lambda, t))
}

/// Single-channel variant of [`block_cost`].
pub fn block_cost_single(
    block: &ImageF32,
    airlight: f32,
    lambda: f64,
    t: f64,
) -> Result<f64, RestoreError> {
    validate(block.is_empty(), 1, 1, t)?;
    Ok(interleaved_cost(&block.data, &[airlight], lambda, t))
}

fn validate(empty: bool, channels: usize, airlight_len: usize, t: f64) -> Result<(), RestoreError> {
    if empty {
        return Err(RestoreError::invalid("block", "zero-area block"));
    }
    if airlight_len != channels {
        return Err(RestoreError::invalid(
            "airlight",
            format!("{airlight_len} values for a {channels}-channel block"),
        ));
    }
    if !(t > 0.0 && t.is_finite()) {
        return Err(RestoreError::invalid(
            "transmission",
            format!("candidate {t} must be finite and > 0"),
        ));
    }
    Ok(())
}

/// Unchecked cost over interleaved samples; callers guarantee a non-empty
/// block, one airlight value per channel and `t > 0`.
pub(super) fn interleaved_cost(data: &[f32], airlight: &[f32], lambda: f64, t: f64) -> f64 {
    if data.is_empty() || airlight.is_empty() {
        return 0.0;
    }
    let gain = 128.0 / t;
    let mut loss = 0.0f64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for px in data.chunks_exact(airlight.len()) {
        for (&v, &a) in px.iter().zip(airlight) {
            let a = a as f64;
            let out = ((v as f64 - a) * gain + 128.0 * a) / 128.0;
            if out > 255.0 {
                loss += (out - 255.0) * (out - 255.0);
            } else if out < 0.0 {
                loss += out * out;
            }
            sum += out;
            sum_sq += out * out;
        }
    }
    let n = data.len() as f64;
    let mean = sum / n;
    let variance = sum_sq / n - mean * mean;
    lambda * loss / n - variance
}
