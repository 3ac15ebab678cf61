//! Channel reductions and per-channel tone stretching.
use crate::error::RestoreError;
use crate::image::{ImageF32, MultiImageF32};
use log::warn;

/// ITU-R BT.601 luma weights for `[R, G, B]`.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

const DEFAULT_BALANCE_PERCENT: f32 = 5.0;

/// Collapse a multi-channel image to one plane.
///
/// Three-channel input is treated as RGB and weighted with
/// [`LUMA_WEIGHTS`]; any other channel count falls back to the plain channel
/// average (a single channel is copied through).
pub fn luminance(img: &MultiImageF32) -> ImageF32 {
    let mut out = ImageF32::new(img.w, img.h);
    if img.channels == 0 {
        return out;
    }
    let weights: Vec<f32> = if img.channels == 3 {
        LUMA_WEIGHTS.to_vec()
    } else {
        vec![1.0 / img.channels as f32; img.channels]
    };
    for (dst, px) in out.data.iter_mut().zip(img.data.chunks_exact(img.channels)) {
        *dst = px.iter().zip(&weights).map(|(&v, &k)| v * k).sum();
    }
    out
}

/// Simplest colour balance: per channel, saturate the darkest and brightest
/// `percent / 2` percent of samples, then stretch the remaining range linearly
/// onto `[0, out_max]`.
///
/// A non-positive `percent` falls back to 5. A channel that is flat after
/// clipping maps to 0.
pub fn simplest_color_balance(
    img: &MultiImageF32,
    percent: f32,
    out_max: f32,
) -> Result<MultiImageF32, RestoreError> {
    if img.is_empty() {
        return Err(RestoreError::invalid("image", "zero-area image"));
    }
    if percent >= 100.0 {
        return Err(RestoreError::invalid(
            "balance percent",
            format!("{percent} must be < 100"),
        ));
    }
    let percent = if percent <= 0.0 {
        warn!("simplest_color_balance: percent {percent} <= 0, using {DEFAULT_BALANCE_PERCENT}");
        DEFAULT_BALANCE_PERCENT
    } else {
        percent
    };
    let half = percent as f64 / 200.0;

    let planes: Vec<ImageF32> = img
        .split_channels()
        .into_iter()
        .map(|plane| {
            let mut sorted = plane.data.clone();
            sorted.sort_by(f32::total_cmp);
            let n = sorted.len();
            let lo_idx = ((n as f64 * half).floor() as usize).min(n - 1);
            let hi_idx = ((n as f64 * (1.0 - half)).ceil() as usize).min(n - 1);
            let low = sorted[lo_idx];
            let top = sorted[hi_idx];
            let clipped = plane.map(|v| v.clamp(low, top));
            let (min, max) = clipped.min_max().unwrap_or((0.0, 0.0));
            let range = max - min;
            if range > f32::EPSILON {
                let scale = out_max / range;
                clipped.map(|v| (v - min) * scale)
            } else {
                ImageF32::new(plane.w, plane.h)
            }
        })
        .collect();
    MultiImageF32::from_channels(&planes)
}
