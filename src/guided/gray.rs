use super::{mul, to_f64, to_image, validate_radius_eps};
use crate::error::RestoreError;
use crate::filters::box_mean_f64;
use crate::image::ImageF32;
use log::debug;
use std::time::Instant;

/// Guided filter with a single-channel guidance.
///
/// `guidance` and `input` must share their size. Returns the filtered input.
pub fn guided_filter(
    guidance: &ImageF32,
    input: &ImageF32,
    radius: usize,
    eps: f64,
) -> Result<ImageF32, RestoreError> {
    if guidance.dims() != input.dims() {
        return Err(RestoreError::DimensionMismatch {
            what: "guidance/input size",
            expected: (guidance.w, guidance.h, 1),
            found: (input.w, input.h, 1),
        });
    }
    if guidance.is_empty() {
        return Err(RestoreError::invalid("image", "zero-area guidance"));
    }
    validate_radius_eps(radius, eps)?;

    let t0 = Instant::now();
    let (w, h) = guidance.dims();
    let box_mean = |plane: &[f64]| box_mean_f64(plane, w, h, radius);

    let i = to_f64(guidance);
    let p = to_f64(input);
    let mean_i = box_mean(&i);
    let mean_p = box_mean(&p);
    let mean_ip = box_mean(&mul(&i, &p));
    let mean_ii = box_mean(&mul(&i, &i));

    let mut a = vec![0.0f64; w * h];
    let mut b = vec![0.0f64; w * h];
    for k in 0..w * h {
        let cov_ip = mean_ip[k] - mean_i[k] * mean_p[k];
        let var_i = mean_ii[k] - mean_i[k] * mean_i[k];
        a[k] = cov_ip / (var_i + eps);
        b[k] = mean_p[k] - a[k] * mean_i[k];
    }

    let mean_a = box_mean(&a);
    let mean_b = box_mean(&b);
    let q: Vec<f64> = (0..w * h).map(|k| mean_a[k] * i[k] + mean_b[k]).collect();

    debug!(
        "guided_filter {}x{} r={} eps={:e} took {:.3} ms",
        w,
        h,
        radius,
        eps,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(to_image(w, h, q))
}
