//! Normalised box (mean) filter in O(1) per pixel.
//!
//! Builds an `f64` summed-area table, then reads each window sum with four
//! lookups. A window of side `r` covers offsets `-(r / 2) ..= r - 1 - r / 2`
//! around the pixel (centre anchor, as for odd sides; even sides lean
//! towards the top-left). Windows are clipped at the border and divided by
//! the number of in-bounds samples, so constants stay constant everywhere.

/// Local mean of a `w × h` row-major `f64` plane over a `window × window`
/// neighbourhood.
pub fn box_mean_f64(data: &[f64], w: usize, h: usize, window: usize) -> Vec<f64> {
    debug_assert_eq!(data.len(), w * h);
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let window = window.max(1);
    let before = window / 2;
    let after = window - 1 - before;

    let iw = w + 1;
    let mut integral = vec![0.0f64; iw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0.0;
        for x in 0..w {
            row_sum += data[y * w + x];
            integral[(y + 1) * iw + x + 1] = integral[y * iw + x + 1] + row_sum;
        }
    }

    let mut out = vec![0.0f64; w * h];
    for y in 0..h {
        let y0 = y.saturating_sub(before);
        let y1 = (y + after + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(before);
            let x1 = (x + after + 1).min(w);
            let sum = integral[y1 * iw + x1] - integral[y0 * iw + x1] - integral[y1 * iw + x0]
                + integral[y0 * iw + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            out[y * w + x] = sum / count;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_of_one_is_identity() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(box_mean_f64(&data, 3, 2, 1), data);
    }

    #[test]
    fn interior_mean_matches_brute_force() {
        let w = 7;
        let h = 6;
        let data: Vec<f64> = (0..w * h).map(|i| ((i * 37) % 11) as f64).collect();
        let out = box_mean_f64(&data, w, h, 3);
        let (x, y) = (3usize, 2usize);
        let mut sum = 0.0;
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                sum += data[yy * w + xx];
            }
        }
        assert!((out[y * w + x] - sum / 9.0).abs() < 1e-12);
    }

    #[test]
    fn border_windows_are_renormalised() {
        let data = vec![3.5; 5 * 4];
        let out = box_mean_f64(&data, 5, 4, 4);
        assert!(out.iter().all(|&v| (v - 3.5).abs() < 1e-12));
    }

    #[test]
    fn even_window_leans_top_left() {
        // window 2 covers offsets {-1, 0}
        let data = vec![0.0, 2.0, 4.0, 6.0];
        let out = box_mean_f64(&data, 4, 1, 2);
        assert_eq!(out, vec![0.0, 1.0, 3.0, 5.0]);
    }
}
