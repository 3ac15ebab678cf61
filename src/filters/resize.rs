//! Resampling helpers for the pyramid and the subsampled guided filter.
//!
//! Bilinear resampling uses half-pixel centres
//! (`src = (dst + 0.5) * scale - 0.5`) with border clamping, so resizing to
//! the same size is the identity and constants are preserved.
use super::separable::clamp_index;
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Size of the next coarser pyramid level: `ceil(n / 2)`, at least 1.
#[inline]
pub fn half_size(w: usize, h: usize) -> (usize, usize) {
    (w.div_ceil(2).max(1), h.div_ceil(2).max(1))
}

/// Bilinear resize of `src` to `nw × nh`.
pub fn resize_bilinear(src: &ImageF32, nw: usize, nh: usize) -> ImageF32 {
    let mut dst = ImageF32::new(nw, nh);
    if src.is_empty() || nw == 0 || nh == 0 {
        return dst;
    }
    if (nw, nh) == src.dims() {
        return src.clone();
    }
    let sx_scale = src.w as f32 / nw as f32;
    let sy_scale = src.h as f32 / nh as f32;

    // Horizontal taps are the same for every row.
    let x_taps: Vec<(usize, usize, f32)> = (0..nw)
        .map(|x| {
            let fx = ((x as f32 + 0.5) * sx_scale - 0.5).max(0.0);
            let x0 = fx.floor() as isize;
            let t = fx - x0 as f32;
            (
                clamp_index(x0, src.w),
                clamp_index(x0 + 1, src.w),
                t,
            )
        })
        .collect();

    for y in 0..nh {
        let fy = ((y as f32 + 0.5) * sy_scale - 0.5).max(0.0);
        let y0 = fy.floor() as isize;
        let ty = fy - y0 as f32;
        let row0 = src.row(clamp_index(y0, src.h));
        let row1 = src.row(clamp_index(y0 + 1, src.h));
        let out = dst.row_mut(y);
        for (px, &(x0, x1, tx)) in out.iter_mut().zip(&x_taps) {
            let top = row0[x0] + (row0[x1] - row0[x0]) * tx;
            let bottom = row1[x0] + (row1[x1] - row1[x0]) * tx;
            *px = top + (bottom - top) * ty;
        }
    }
    dst
}

/// Nearest-neighbour resize of `src` to `nw × nh`.
pub fn resize_nearest(src: &ImageF32, nw: usize, nh: usize) -> ImageF32 {
    let mut dst = ImageF32::new(nw, nh);
    if src.is_empty() || nw == 0 || nh == 0 {
        return dst;
    }
    let sx_scale = src.w as f64 / nw as f64;
    let sy_scale = src.h as f64 / nh as f64;
    for y in 0..nh {
        let sy = ((y as f64 * sy_scale).floor() as usize).min(src.h - 1);
        let src_row = src.row(sy);
        let out = dst.row_mut(y);
        for (x, px) in out.iter_mut().enumerate() {
            let sx = ((x as f64 * sx_scale).floor() as usize).min(src.w - 1);
            *px = src_row[sx];
        }
    }
    dst
}
