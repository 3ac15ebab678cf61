use super::options::RefineOptions;
use crate::error::RestoreError;
use crate::filters::{apply_separable, luminance, GaussianKernel};
use crate::guided::guided_filter;
use crate::image::{ImageF32, MultiImageF32};
use log::debug;
use std::time::Instant;

/// Edge-aware refinement of a blocky transmission map.
///
/// The map is guided-filtered against the source luminance (scaled to
/// `[0, 1]`), then its high frequencies are scaled by `gamma` around a wide
/// Gaussian base: `base + gamma · (refined − base)`.
pub fn refine_transmission(
    image: &MultiImageF32,
    map: &ImageF32,
    options: &RefineOptions,
) -> Result<ImageF32, RestoreError> {
    if image.dims() != map.dims() {
        return Err(RestoreError::DimensionMismatch {
            what: "image/transmission size",
            expected: (image.w, image.h, 1),
            found: (map.w, map.h, 1),
        });
    }
    let t0 = Instant::now();
    let guidance = luminance(image).map(|v| v / 255.0);
    let refined = guided_filter(&guidance, map, options.radius, options.eps)?;
    let kernel = GaussianKernel::new(options.detail_kernel, options.detail_sigma);
    let base = apply_separable(&kernel, &refined);
    let gamma = options.gamma;
    let out = base.zip_map(&refined, |b, r| b + gamma * (r - b));
    debug!(
        "refine_transmission: r={} eps={} gamma={} kernel={} took {:.3} ms",
        options.radius,
        options.eps,
        gamma,
        options.detail_kernel,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_map_keeps_its_value() {
        let mut img = MultiImageF32::new(24, 16, 3);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = ((i * 37) % 256) as f32;
        }
        let map = ImageF32::filled(24, 16, 0.45);
        let out = refine_transmission(&img, &map, &RefineOptions::new(4, 1e-3, 2.0)).unwrap();
        assert!((out.mean() - 0.45).abs() < 1e-4, "mean={}", out.mean());
        assert!(out.data.iter().all(|&v| (v - 0.45).abs() < 1e-3));
    }

    #[test]
    fn unit_gamma_returns_guided_output() {
        let img = MultiImageF32::from_pixel(10, 10, &[100.0, 100.0, 100.0]);
        let mut map = ImageF32::filled(10, 10, 0.3);
        for y in 0..10 {
            for x in 5..10 {
                map.set(x, y, 0.8);
            }
        }
        let opts = RefineOptions::new(3, 1e-3, 1.0).with_detail_kernel(5, 1.0);
        let out = refine_transmission(&img, &map, &opts).unwrap();
        let guidance = luminance(&img).map(|v| v / 255.0);
        let guided = guided_filter(&guidance, &map, 3, 1e-3).unwrap();
        for (a, b) in out.data.iter().zip(&guided.data) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_size_mismatch() {
        let img = MultiImageF32::new(8, 8, 3);
        let map = ImageF32::new(8, 4);
        assert!(matches!(
            refine_transmission(&img, &map, &RefineOptions::default()),
            Err(RestoreError::DimensionMismatch { .. })
        ));
    }
}
