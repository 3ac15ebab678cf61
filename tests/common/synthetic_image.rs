use restoration_core::{ImageF32, MultiImageF32};

/// Per-pixel checkerboard scene alternating between a dark and a bright
/// colour. Every 2×2 window holds both.
pub fn checker_scene(width: usize, height: usize, dark: [f32; 3], bright: [f32; 3]) -> MultiImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = MultiImageF32::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let px = if (x + y) % 2 == 0 { dark } else { bright };
            img.pixel_mut(x, y).copy_from_slice(&px);
        }
    }
    img
}

/// Apply the haze model `I = J·t + A·(1 − t)` pixel-wise.
pub fn add_haze(clear: &MultiImageF32, transmission: &ImageF32, airlight: &[f32]) -> MultiImageF32 {
    assert_eq!((clear.w, clear.h), (transmission.w, transmission.h));
    let mut out = clear.clone();
    for y in 0..clear.h {
        for x in 0..clear.w {
            let t = transmission.get(x, y);
            for (v, &a) in out.pixel_mut(x, y).iter_mut().zip(airlight) {
                *v = *v * t + a * (1.0 - t);
            }
        }
    }
    out
}

/// Hazy 64×64 test scene.
///
/// - top-left quadrant: pure sky (the airlight itself);
/// - bottom-left quadrant: checker texture behind transmission `t_left`;
/// - right half: the same texture behind `t_right`.
pub struct HazyScene {
    pub image: MultiImageF32,
    pub transmission: ImageF32,
    pub airlight: [f32; 3],
}

pub fn hazy_scene(t_left: f32, t_right: f32) -> HazyScene {
    let (w, h) = (64usize, 64usize);
    let airlight = [240.0, 245.0, 250.0];
    let clear = checker_scene(w, h, [5.0, 5.0, 5.0], [200.0, 190.0, 180.0]);
    let mut transmission = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let t = if x >= w / 2 {
                t_right
            } else if y >= h / 2 {
                t_left
            } else {
                0.0
            };
            transmission.set(x, y, t);
        }
    }
    let image = add_haze(&clear, &transmission, &airlight);
    HazyScene {
        image,
        transmission,
        airlight,
    }
}
