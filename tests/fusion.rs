mod common;

use common::synthetic_image::{checker_scene, hazy_scene};
use restoration_core::pyramid::{collapse_laplacian, laplacian_pyramid};
use restoration_core::{fuse_pyramids, ImageF32};

#[test]
fn constant_weights_average_the_inputs() {
    let _ = env_logger::builder().is_test(true).try_init();
    let a = hazy_scene(0.4, 0.8).image;
    let b = checker_scene(64, 64, [10.0, 60.0, 110.0], [230.0, 180.0, 130.0]);
    let half = ImageF32::filled(64, 64, 0.5);
    let fused = fuse_pyramids(&half, &a, &half, &b, 5).unwrap();
    for ((f, x), y) in fused.data.iter().zip(&a.data).zip(&b.data) {
        let want = 0.5 * (x + y);
        assert!((f - want).abs() < 1e-2, "fused {f} vs average {want}");
    }
}

#[test]
fn spatial_weights_select_regions() {
    let _ = env_logger::builder().is_test(true).try_init();
    let a = checker_scene(48, 32, [0.0; 3], [0.0; 3]);
    let b = checker_scene(48, 32, [200.0; 3], [200.0; 3]);
    let mut wa = ImageF32::new(48, 32);
    for y in 0..32 {
        for x in 0..24 {
            wa.set(x, y, 1.0);
        }
    }
    let wb = wa.map(|v| 1.0 - v);
    let fused = fuse_pyramids(&wa, &a, &wb, &b, 4).unwrap();
    // Far from the seam each side reproduces its source.
    assert!(fused.pixel(2, 16)[0].abs() < 5.0, "{}", fused.pixel(2, 16)[0]);
    assert!((fused.pixel(45, 16)[0] - 200.0).abs() < 5.0);
}

#[test]
fn laplacian_levels_collapse_back() {
    let plane = hazy_scene(0.3, 0.7).image.channel(1);
    let levels = laplacian_pyramid(&plane, 5).unwrap();
    assert_eq!(levels.len(), 5);
    assert_eq!((levels[4].w, levels[4].h), (4, 4));
    let back = collapse_laplacian(levels).unwrap();
    for (a, b) in back.data.iter().zip(&plane.data) {
        assert!((a - b).abs() < 1e-3);
    }
}
