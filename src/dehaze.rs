//! Scene radiance recovery from the haze model `I = J·t + A·(1 − t)`.

use crate::error::RestoreError;
use crate::image::{ImageF32, MultiImageF32};

/// Invert the haze model: `J = (I − A) / max(t, min_transmission) + A`.
///
/// `min_transmission` guards against division by (near) zero; pass `0.0` to
/// use the map as is. The output is not clamped.
pub fn recover_radiance(
    image: &MultiImageF32,
    transmission: &ImageF32,
    airlight: &[f32],
    min_transmission: f32,
) -> Result<MultiImageF32, RestoreError> {
    if image.dims() != transmission.dims() {
        return Err(RestoreError::DimensionMismatch {
            what: "image/transmission size",
            expected: (image.w, image.h, 1),
            found: (transmission.w, transmission.h, 1),
        });
    }
    if airlight.len() != image.channels {
        return Err(RestoreError::invalid(
            "airlight",
            format!(
                "{} values for a {}-channel image",
                airlight.len(),
                image.channels
            ),
        ));
    }
    if !(min_transmission >= 0.0) {
        return Err(RestoreError::invalid(
            "min transmission",
            format!("{min_transmission} must be >= 0"),
        ));
    }
    let mut out = image.clone();
    if image.channels == 0 {
        return Ok(out);
    }
    for (px, &t) in out
        .data
        .chunks_exact_mut(image.channels)
        .zip(&transmission.data)
    {
        let t = t.max(min_transmission);
        for (v, &a) in px.iter_mut().zip(airlight) {
            *v = (*v - a) / t + a;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverts_the_haze_model() {
        let airlight = [230.0, 240.0, 250.0];
        let mut clear = MultiImageF32::new(6, 4, 3);
        let mut t = ImageF32::new(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                clear
                    .pixel_mut(x, y)
                    .copy_from_slice(&[(x * 40) as f32, (y * 50) as f32, 90.0]);
                t.set(x, y, 0.25 + 0.1 * x as f32);
            }
        }
        let mut hazy = clear.clone();
        for y in 0..4 {
            for x in 0..6 {
                let tv = t.get(x, y);
                for (v, a) in hazy.pixel_mut(x, y).iter_mut().zip(airlight) {
                    *v = *v * tv + a * (1.0 - tv);
                }
            }
        }
        let back = recover_radiance(&hazy, &t, &airlight, 0.0).unwrap();
        for (a, b) in back.data.iter().zip(&clear.data) {
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn floor_limits_amplification() {
        let img = MultiImageF32::from_pixel(2, 2, &[100.0]);
        let t = ImageF32::new(2, 2);
        let out = recover_radiance(&img, &t, &[200.0], 0.5).unwrap();
        assert!(out.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let img = MultiImageF32::new(3, 3, 3);
        assert!(recover_radiance(&img, &ImageF32::new(3, 2), &[1.0; 3], 0.1).is_err());
        assert!(recover_radiance(&img, &ImageF32::new(3, 3), &[1.0; 2], 0.1).is_err());
        assert!(recover_radiance(&img, &ImageF32::new(3, 3), &[1.0; 3], -1.0).is_err());
    }
}
