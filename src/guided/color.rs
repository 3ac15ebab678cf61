use super::{mul, to_f64, to_image, validate_radius_eps};
use crate::error::RestoreError;
use crate::filters::{box_mean_f64, resize_bilinear, resize_nearest};
use crate::image::{ImageF32, MultiImageF32};
use log::debug;
use nalgebra::{Matrix3, Vector3};
use std::time::Instant;

/// Closed-form inverse of a symmetric 3×3 matrix via its adjugate.
///
/// Only the upper triangle is read. Returns `None` when the determinant is
/// zero or not finite.
pub fn invert_symmetric3(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let (rr, rg, rb) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (gg, gb, bb) = (m[(1, 1)], m[(1, 2)], m[(2, 2)]);

    let inv_rr = gg * bb - gb * gb;
    let inv_rg = gb * rb - rg * bb;
    let inv_rb = rg * gb - gg * rb;
    let inv_gg = rr * bb - rb * rb;
    let inv_gb = rb * rg - rr * gb;
    let inv_bb = rr * gg - rg * rg;

    let det = inv_rr * rr + inv_rg * rg + inv_rb * rb;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let adj = Matrix3::new(
        inv_rr, inv_rg, inv_rb, //
        inv_rg, inv_gg, inv_gb, //
        inv_rb, inv_gb, inv_bb,
    );
    Some(adj / det)
}

/// Guidance-only statistics, shared by every filtered channel.
struct ColorGuide {
    w: usize,
    h: usize,
    full: [ImageF32; 3],
    sub: [Vec<f64>; 3],
    mean: [Vec<f64>; 3],
    inv_sigma: Vec<Matrix3<f64>>,
    sub_w: usize,
    sub_h: usize,
    window: usize,
}

impl ColorGuide {
    fn new(guidance: &MultiImageF32, radius: usize, eps: f64, subsample: usize) -> Self {
        let sub_w = (guidance.w / subsample).max(1);
        let sub_h = (guidance.h / subsample).max(1);
        let window = radius / subsample;
        let full = [guidance.channel(0), guidance.channel(1), guidance.channel(2)];
        let sub = [0, 1, 2].map(|c| to_f64(&resize_nearest(&full[c], sub_w, sub_h)));
        let box_mean = |plane: &[f64]| box_mean_f64(plane, sub_w, sub_h, window);
        let mean = [0, 1, 2].map(|c| box_mean(&sub[c]));

        let var = |c0: usize, c1: usize| -> Vec<f64> {
            let corr = box_mean(&mul(&sub[c0], &sub[c1]));
            corr.iter()
                .zip(mean[c0].iter().zip(&mean[c1]))
                .map(|(e, (m0, m1))| e - m0 * m1)
                .collect()
        };
        let (rr, rg, rb) = (var(0, 0), var(0, 1), var(0, 2));
        let (gg, gb, bb) = (var(1, 1), var(1, 2), var(2, 2));

        let mut singular = 0usize;
        let inv_sigma: Vec<Matrix3<f64>> = (0..sub_w * sub_h)
            .map(|k| {
                let sigma = Matrix3::new(
                    rr[k] + eps, rg[k], rb[k], //
                    rg[k], gg[k] + eps, gb[k], //
                    rb[k], gb[k], bb[k] + eps,
                );
                invert_symmetric3(&sigma).unwrap_or_else(|| {
                    singular += 1;
                    Matrix3::zeros()
                })
            })
            .collect();
        if singular > 0 {
            debug!("guided_filter_color: {singular} singular covariance cells, a = 0 there");
        }

        Self {
            w: guidance.w,
            h: guidance.h,
            full,
            sub,
            mean,
            inv_sigma,
            sub_w,
            sub_h,
            window,
        }
    }

    fn filter_channel(&self, p: &ImageF32) -> ImageF32 {
        let (w, h) = (self.w, self.h);
        let (sw, sh) = (self.sub_w, self.sub_h);
        let box_mean = |plane: &[f64]| box_mean_f64(plane, sw, sh, self.window);

        let p_sub = to_f64(&resize_nearest(p, sw, sh));
        let mean_p = box_mean(&p_sub);
        let mean_ip = [0, 1, 2].map(|c| box_mean(&mul(&self.sub[c], &p_sub)));

        let n = sw * sh;
        let mut a = [vec![0.0f64; n], vec![0.0f64; n], vec![0.0f64; n]];
        let mut b = vec![0.0f64; n];
        for k in 0..n {
            let mean_i = Vector3::new(self.mean[0][k], self.mean[1][k], self.mean[2][k]);
            let cov_ip = Vector3::new(
                mean_ip[0][k] - mean_i[0] * mean_p[k],
                mean_ip[1][k] - mean_i[1] * mean_p[k],
                mean_ip[2][k] - mean_i[2] * mean_p[k],
            );
            let ak = self.inv_sigma[k] * cov_ip;
            for c in 0..3 {
                a[c][k] = ak[c];
            }
            b[k] = mean_p[k] - ak.dot(&mean_i);
        }

        let upsample = |plane: &[f64]| resize_bilinear(&to_image(sw, sh, box_mean(plane)), w, h);
        let mean_a = [upsample(&a[0]), upsample(&a[1]), upsample(&a[2])];
        let mean_b = upsample(&b);

        let mut q = mean_b;
        for (c, coeff) in mean_a.iter().enumerate() {
            for ((dst, &ac), &ic) in q.data.iter_mut().zip(&coeff.data).zip(&self.full[c].data) {
                *dst += ac * ic;
            }
        }
        q
    }
}

fn validate(
    guidance: &MultiImageF32,
    input_dims: (usize, usize, usize),
    radius: usize,
    eps: f64,
    subsample: usize,
) -> Result<(), RestoreError> {
    if guidance.channels != 3 {
        return Err(RestoreError::invalid(
            "guidance",
            format!("colour guidance needs 3 channels, got {}", guidance.channels),
        ));
    }
    if guidance.dims() != (input_dims.0, input_dims.1) {
        return Err(RestoreError::DimensionMismatch {
            what: "guidance/input size",
            expected: guidance.shape(),
            found: input_dims,
        });
    }
    if guidance.is_empty() || input_dims.2 == 0 {
        return Err(RestoreError::invalid("image", "zero-area guidance or input"));
    }
    validate_radius_eps(radius, eps)?;
    if subsample == 0 {
        return Err(RestoreError::invalid("subsample", "factor must be >= 1"));
    }
    if radius / subsample == 0 {
        return Err(RestoreError::invalid(
            "subsample",
            format!("radius {radius} / subsample {subsample} leaves an empty window"),
        ));
    }
    Ok(())
}

/// Guided filter with a three-channel guidance.
///
/// Every channel of `input` is filtered against the same guidance, so the
/// output has the input's channel count.
pub fn guided_filter_color(
    guidance: &MultiImageF32,
    input: &MultiImageF32,
    radius: usize,
    eps: f64,
    subsample: usize,
) -> Result<MultiImageF32, RestoreError> {
    validate(guidance, input.shape(), radius, eps, subsample)?;
    let t0 = Instant::now();
    let guide = ColorGuide::new(guidance, radius, eps, subsample);
    let planes = input.split_channels();

    #[cfg(feature = "parallel")]
    let filtered: Vec<ImageF32> = {
        use rayon::prelude::*;
        planes.par_iter().map(|p| guide.filter_channel(p)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let filtered: Vec<ImageF32> = planes.iter().map(|p| guide.filter_channel(p)).collect();

    debug!(
        "guided_filter_color {}x{}x{} r={} eps={:e} s={} took {:.3} ms",
        input.w,
        input.h,
        input.channels,
        radius,
        eps,
        subsample,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    MultiImageF32::from_channels(&filtered)
}

/// Single-channel convenience wrapper around [`guided_filter_color`].
pub fn guided_filter_color_single(
    guidance: &MultiImageF32,
    input: &ImageF32,
    radius: usize,
    eps: f64,
    subsample: usize,
) -> Result<ImageF32, RestoreError> {
    validate(guidance, (input.w, input.h, 1), radius, eps, subsample)?;
    Ok(ColorGuide::new(guidance, radius, eps, subsample).filter_channel(input))
}
