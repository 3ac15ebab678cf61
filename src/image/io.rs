//! I/O helpers for the command-line tools.
//!
//! - `load_rgb_image`: read a PNG/JPEG into a 3-channel float image in `[0, 255]`.
//! - `save_rgb_f32`: write a 3-channel float image, clamping to `[0, 255]`.
//! - `save_grayscale_f32`: write a unit-range map (e.g. transmission) as 8-bit gray.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView, MultiImageF32};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as interleaved RGB samples in `[0, 255]`.
pub fn load_rgb_image(path: &Path) -> Result<MultiImageF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw().into_iter().map(f32::from).collect();
    MultiImageF32::from_vec(width, height, 3, data)
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))
}

/// Save a 3-channel float image to disk, rounding and clamping to `[0, 255]`.
pub fn save_rgb_f32(image: &MultiImageF32, path: &Path) -> Result<(), String> {
    if image.channels != 3 {
        return Err(format!(
            "Cannot save {}: expected 3 channels, found {}",
            path.display(),
            image.channels
        ));
    }
    ensure_parent_dir(path)?;
    let mut out = RgbImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        for x in 0..image.w {
            let px = image.pixel(x, y);
            out.put_pixel(x as u32, y as u32, Rgb([to_u8(px[0]), to_u8(px[1]), to_u8(px[2])]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float map with values in `[0, 1]` to a grayscale PNG.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        let row = image.row(y);
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([to_u8(px * 255.0)]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
