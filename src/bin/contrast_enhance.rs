use restoration_core::airlight::estimate_airlight;
use restoration_core::config::enhance::{self, EnhanceToolConfig};
use restoration_core::dehaze::recover_radiance;
use restoration_core::filters::simplest_color_balance;
use restoration_core::image::io::{
    load_rgb_image, save_grayscale_f32, save_rgb_f32, write_json_file,
};
use restoration_core::transmission::estimate_transmission;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = enhance::load_config(Path::new(&config_path))?;
    let image = load_rgb_image(&config.input)?;
    let started = Instant::now();

    let airlight =
        estimate_airlight(&image, config.airlight.block_area).map_err(|e| e.to_string())?;
    let transmission = estimate_transmission(&image, &airlight.values, &config.transmission)
        .map_err(|e| e.to_string())?;
    let mut restored = recover_radiance(
        &image,
        &transmission,
        &airlight.values,
        config.recovery.min_transmission,
    )
    .map_err(|e| e.to_string())?;
    if let Some(percent) = config.recovery.balance_percent {
        restored = simplest_color_balance(&restored, percent, 255.0).map_err(|e| e.to_string())?;
    }
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    save_rgb_f32(&restored, &config.output.image)?;
    println!("Saved restored image to {}", config.output.image.display());
    if let Some(path) = &config.output.transmission {
        save_grayscale_f32(&transmission, path)?;
        println!("Saved transmission map to {}", path.display());
    }
    if let Some(path) = &config.output.summary_json {
        write_json_file(path, &summarize(&config, &airlight, &transmission, latency_ms))?;
        println!("Saved summary to {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: contrast_enhance <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceSummary {
    width: usize,
    height: usize,
    airlight: Vec<f32>,
    airlight_region: restoration_core::Block,
    patch_size: usize,
    lambda: f64,
    refined: bool,
    transmission_min: f32,
    transmission_max: f32,
    transmission_mean: f64,
    latency_ms: f64,
}

fn summarize(
    config: &EnhanceToolConfig,
    airlight: &restoration_core::Airlight,
    transmission: &restoration_core::ImageF32,
    latency_ms: f64,
) -> EnhanceSummary {
    let (transmission_min, transmission_max) = transmission.min_max().unwrap_or((0.0, 0.0));
    EnhanceSummary {
        width: transmission.w,
        height: transmission.h,
        airlight: airlight.values.clone(),
        airlight_region: airlight.region,
        patch_size: config.transmission.patch_size,
        lambda: config.transmission.lambda,
        refined: config.transmission.refine.is_some(),
        transmission_min,
        transmission_max,
        transmission_mean: transmission.mean(),
        latency_ms,
    }
}
