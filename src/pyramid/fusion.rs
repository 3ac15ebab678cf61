use super::build::Pyramid;
use super::options::PyramidOptions;
use crate::error::RestoreError;
use crate::image::{ImageF32, MultiImageF32};
use log::debug;
use std::time::Instant;

/// Fuse two images with per-pixel weights in the Laplacian domain using the
/// default 5-tap low-pass kernel.
///
/// Weights are expected to be normalised by the caller (`w1 + w2 = 1`); they
/// are not rescaled here.
pub fn fuse_pyramids(
    weight1: &ImageF32,
    image1: &MultiImageF32,
    weight2: &ImageF32,
    image2: &MultiImageF32,
    levels: usize,
) -> Result<MultiImageF32, RestoreError> {
    fuse_pyramids_with(
        weight1,
        image1,
        weight2,
        image2,
        &PyramidOptions::new(levels),
    )
}

/// [`fuse_pyramids`] with explicit options.
pub fn fuse_pyramids_with(
    weight1: &ImageF32,
    image1: &MultiImageF32,
    weight2: &ImageF32,
    image2: &MultiImageF32,
    options: &PyramidOptions,
) -> Result<MultiImageF32, RestoreError> {
    if options.levels == 0 {
        return Err(RestoreError::invalid("levels", "pyramid needs >= 1 level"));
    }
    if image1.is_empty() {
        return Err(RestoreError::invalid("image", "zero-area image"));
    }
    if image1.shape() != image2.shape() {
        return Err(RestoreError::DimensionMismatch {
            what: "fusion image shape",
            expected: image1.shape(),
            found: image2.shape(),
        });
    }
    for weight in [weight1, weight2] {
        if weight.dims() != image1.dims() {
            return Err(RestoreError::DimensionMismatch {
                what: "weight/image size",
                expected: (image1.w, image1.h, 1),
                found: (weight.w, weight.h, 1),
            });
        }
    }

    let t0 = Instant::now();
    let gauss1 = Pyramid::gaussian(weight1, options.levels, &options.filter);
    let gauss2 = Pyramid::gaussian(weight2, options.levels, &options.filter);
    let planes1 = image1.split_channels();
    let planes2 = image2.split_channels();

    let fuse_channel = |c: usize| fuse_bands(&gauss1, &planes1[c], &gauss2, &planes2[c], options);

    #[cfg(feature = "parallel")]
    let fused: Vec<ImageF32> = {
        use rayon::prelude::*;
        (0..image1.channels)
            .into_par_iter()
            .map(fuse_channel)
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let fused: Vec<ImageF32> = (0..image1.channels).map(fuse_channel).collect();

    debug!(
        "fuse_pyramids {}x{}x{} levels={} took {:.3} ms",
        image1.w,
        image1.h,
        image1.channels,
        options.levels,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    MultiImageF32::from_channels(&fused)
}

fn fuse_bands(
    gauss1: &Pyramid,
    plane1: &ImageF32,
    gauss2: &Pyramid,
    plane2: &ImageF32,
    options: &PyramidOptions,
) -> ImageF32 {
    let lap1 = Pyramid::laplacian(plane1, options.levels);
    let lap2 = Pyramid::laplacian(plane2, options.levels);
    let levels = lap1
        .levels
        .iter()
        .zip(&lap2.levels)
        .zip(gauss1.levels.iter().zip(&gauss2.levels))
        .map(|((l1, l2), (g1, g2))| {
            let mut band = ImageF32::new(l1.w, l1.h);
            for (k, dst) in band.data.iter_mut().enumerate() {
                *dst = l1.data[k] * g1.data[k] + l2.data[k] * g2.data[k];
            }
            band
        })
        .collect();
    Pyramid { levels }.collapse()
}
