//! Edge-aware guided image filter (He et al.), O(1) per pixel.
//!
//! For every window the output is modelled as an affine function of the
//! guidance, `q = a·I + b`, fitted by ridge regression against the input `p`:
//!
//! - `a = cov(I, p) / (var(I) + eps)` and `b = mean(p) − a·mean(I)`;
//! - `a` and `b` are then averaged over all windows covering a pixel.
//!
//! Two variants are provided:
//! - [`guided_filter`]: single-channel guidance.
//! - [`guided_filter_color`]: three-channel guidance. The per-window
//!   statistic becomes a 3×3 covariance (+ `eps·I`) that is inverted in
//!   closed form. The coefficients are computed on a grid subsampled by
//!   `subsample` and bilinearly upsampled before the final combination.
//!
//! Windows follow [`box_mean_f64`]: side `radius`, clipped at the border.
//! All statistics are accumulated in `f64`.
//!
//! Parameters
//! - Larger `eps` smooths more and preserves fewer edges. It must be > 0.
//! - `radius` is the window side in pixels (reference pipelines use 4–60).
//!
//! [`box_mean_f64`]: crate::filters::box_mean_f64

mod color;
mod gray;

pub use color::{guided_filter_color, guided_filter_color_single, invert_symmetric3};
pub use gray::guided_filter;

use crate::error::RestoreError;
use crate::image::ImageF32;
use serde::Deserialize;

/// Parameters shared by both guided filter variants.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GuidedFilterOptions {
    /// Window side in pixels (> 0).
    pub radius: usize,
    /// Regularisation added to the local variance (> 0).
    pub eps: f64,
    /// Subsampling factor for the colour variant (>= 1, 1 = full resolution).
    pub subsample: usize,
}

impl Default for GuidedFilterOptions {
    fn default() -> Self {
        Self {
            radius: 16,
            eps: 0.01,
            subsample: 1,
        }
    }
}

pub(crate) fn validate_radius_eps(radius: usize, eps: f64) -> Result<(), RestoreError> {
    if radius == 0 {
        return Err(RestoreError::invalid("radius", "window side must be > 0"));
    }
    if !(eps > 0.0) {
        return Err(RestoreError::invalid(
            "eps",
            format!("{eps} must be > 0 to keep flat regions well defined"),
        ));
    }
    Ok(())
}

#[inline]
pub(crate) fn to_f64(img: &ImageF32) -> Vec<f64> {
    img.data.iter().map(|&v| v as f64).collect()
}

#[inline]
pub(crate) fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

#[inline]
pub(crate) fn to_image(w: usize, h: usize, data: Vec<f64>) -> ImageF32 {
    ImageF32 {
        w,
        h,
        stride: w,
        data: data.into_iter().map(|v| v as f32).collect(),
    }
}
