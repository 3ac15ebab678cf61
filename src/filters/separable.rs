//! Separable 1D filters applied horizontally then vertically.
//!
//! The fixed 5-tap binomial kernel drives the fusion pyramid; the
//! sigma-parameterised [`GaussianKernel`] drives the large blur used by the
//! transmission detail boost.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// Sampled, normalised Gaussian of odd length `size` and std-dev `sigma`.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// `size` is forced odd (even sizes grow by one). A non-positive `sigma`
    /// falls back to `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn new(size: usize, sigma: f64) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let center = (size as f64 - 1.0) * 0.5;
        let scale = -0.5 / (sigma * sigma);
        let raw: Vec<f64> = (0..size)
            .map(|i| {
                let d = i as f64 - center;
                (scale * d * d).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Self {
            taps: raw.into_iter().map(|v| (v / sum) as f32).collect(),
        }
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Convolve `inp` with `filter` along x then y, clamping at the borders.
pub fn apply(filter: &dyn SeparableFilter, inp: &ImageF32) -> ImageF32 {
    let w = inp.w;
    let h = inp.h;
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let taps = filter.taps();
    let radius = (taps.len() / 2) as isize;

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let src = inp.row(y);
        let dst = tmp.row_mut(y);
        for (x, dst_px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * src[sx];
            }
            *dst_px = acc;
        }
    }

    for y in 0..h {
        let dst = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src = tmp.row(sy);
            for (dst_px, &v) in dst.iter_mut().zip(src) {
                *dst_px += tap * v;
            }
        }
    }
    out
}

pub(crate) fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_kernel_is_normalised_and_symmetric() {
        let k = GaussianKernel::new(81, 40.0);
        let taps = k.taps();
        assert_eq!(taps.len(), 81);
        let sum: f32 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum={sum}");
        assert!((taps[0] - taps[80]).abs() < 1e-9);
        assert!(taps[40] > taps[0]);
        assert_eq!(GaussianKernel::new(4, 1.0).taps().len(), 5);
    }

    #[test]
    fn blur_preserves_constant_image() {
        let img = ImageF32::filled(7, 5, 0.25);
        let out = apply(&GAUSSIAN_5TAP, &img);
        assert!(out.data.iter().all(|&v| (v - 0.25).abs() < 1e-6));
    }

    #[test]
    fn blur_spreads_impulse() {
        let mut img = ImageF32::new(9, 9);
        img.set(4, 4, 1.0);
        let out = apply(&GAUSSIAN_5TAP, &img);
        assert!((out.get(4, 4) - 0.375 * 0.375).abs() < 1e-6);
        assert!((out.get(2, 4) - 0.0625 * 0.375).abs() < 1e-6);
        assert_eq!(out.get(1, 4), 0.0);
    }
}
