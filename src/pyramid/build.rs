use crate::error::RestoreError;
use crate::filters::{apply_separable, half_size, resize_bilinear, SeparableFilter, GAUSSIAN_5TAP};
use crate::image::ImageF32;

#[derive(Clone, Debug, Default)]
pub struct Pyramid {
    pub levels: Vec<ImageF32>,
}

impl Pyramid {
    /// Low-pass pyramid: level `i` is `filter(halve^i(image))`.
    ///
    /// # Panics
    /// If `levels == 0`. [`gaussian_pyramid`] reports it as an error instead.
    pub fn gaussian(image: &ImageF32, levels: usize, filter: &dyn SeparableFilter) -> Self {
        assert!(levels >= 1, "pyramid requires at least one level");
        let mut out = Vec::with_capacity(levels);
        let mut current = image.clone();
        for lvl in 0..levels {
            out.push(apply_separable(filter, &current));
            if lvl + 1 < levels {
                let (nw, nh) = half_size(current.w, current.h);
                current = resize_bilinear(&current, nw, nh);
            }
        }
        Self { levels: out }
    }

    /// Band-pass pyramid; the coarsest level holds the low-pass residue.
    ///
    /// # Panics
    /// If `levels == 0`. [`laplacian_pyramid`] reports it as an error instead.
    pub fn laplacian(image: &ImageF32, levels: usize) -> Self {
        assert!(levels >= 1, "pyramid requires at least one level");
        let mut out = Vec::with_capacity(levels);
        out.push(image.clone());
        for lvl in 1..levels {
            let prev = &out[lvl - 1];
            let (nw, nh) = half_size(prev.w, prev.h);
            let down = resize_bilinear(prev, nw, nh);
            out.push(down);
        }
        // Finest first: level i still holds the low-pass image when read.
        for lvl in 0..levels - 1 {
            let (w, h) = out[lvl].dims();
            let up = resize_bilinear(&out[lvl + 1], w, h);
            for (dst, &u) in out[lvl].data.iter_mut().zip(&up.data) {
                *dst -= u;
            }
        }
        Self { levels: out }
    }

    /// Collapse a Laplacian pyramid back into an image, coarse to fine.
    pub fn collapse(self) -> ImageF32 {
        let mut levels = self.levels.into_iter().rev();
        let Some(mut acc) = levels.next() else {
            return ImageF32::new(0, 0);
        };
        for finer in levels {
            let up = resize_bilinear(&acc, finer.w, finer.h);
            acc = finer;
            for (dst, &u) in acc.data.iter_mut().zip(&up.data) {
                *dst += u;
            }
        }
        acc
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn check_levels(image: &ImageF32, levels: usize) -> Result<(), RestoreError> {
    if levels == 0 {
        return Err(RestoreError::invalid("levels", "pyramid needs >= 1 level"));
    }
    if image.is_empty() {
        return Err(RestoreError::invalid("image", "zero-area image"));
    }
    Ok(())
}

/// Gaussian pyramid with the 5-tap kernel, finest level first.
pub fn gaussian_pyramid(image: &ImageF32, levels: usize) -> Result<Vec<ImageF32>, RestoreError> {
    check_levels(image, levels)?;
    Ok(Pyramid::gaussian(image, levels, &GAUSSIAN_5TAP).levels)
}

/// Laplacian pyramid, finest level first; the last level is the low-pass residue.
pub fn laplacian_pyramid(image: &ImageF32, levels: usize) -> Result<Vec<ImageF32>, RestoreError> {
    check_levels(image, levels)?;
    Ok(Pyramid::laplacian(image, levels).levels)
}

pub fn collapse_laplacian(levels: Vec<ImageF32>) -> Result<ImageF32, RestoreError> {
    if levels.is_empty() {
        return Err(RestoreError::invalid("levels", "nothing to collapse"));
    }
    Ok(Pyramid { levels }.collapse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, (x * 7 + y * 13) as f32 % 17.0);
            }
        }
        img
    }

    #[test]
    fn level_sizes_halve_and_round_up() {
        let pyr = Pyramid::laplacian(&ramp(13, 6), 4);
        let dims: Vec<_> = pyr.levels.iter().map(ImageF32::dims).collect();
        assert_eq!(dims, vec![(13, 6), (7, 3), (4, 2), (2, 1)]);
    }

    #[test]
    fn laplacian_collapse_round_trips() {
        let img = ramp(19, 11);
        for levels in 1..=5 {
            let back = Pyramid::laplacian(&img, levels).collapse();
            let err = img
                .data
                .iter()
                .zip(&back.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max);
            assert!(err < 1e-4, "levels={levels} err={err}");
        }
    }

    #[test]
    fn gaussian_pyramid_of_constant_stays_constant() {
        let pyr = Pyramid::gaussian(&ImageF32::filled(9, 9, 0.3), 4, &GAUSSIAN_5TAP);
        assert_eq!(pyr.len(), 4);
        for level in &pyr.levels {
            assert!(level.data.iter().all(|&v| (v - 0.3).abs() < 1e-6));
        }
    }

    #[test]
    fn free_builders_reject_zero_levels() {
        let img = ramp(8, 8);
        assert!(matches!(
            laplacian_pyramid(&img, 0),
            Err(RestoreError::InvalidArgument { .. })
        ));
        assert!(matches!(
            gaussian_pyramid(&img, 0),
            Err(RestoreError::InvalidArgument { .. })
        ));
        assert!(gaussian_pyramid(&ImageF32::new(0, 3), 2).is_err());
        assert!(collapse_laplacian(Vec::new()).is_err());
        assert_eq!(gaussian_pyramid(&img, 3).unwrap().len(), 3);
    }
}
