use restoration_core::config::smooth;
use restoration_core::guided::guided_filter_color;
use restoration_core::image::io::{load_rgb_image, save_rgb_f32};
use restoration_core::MultiImageF32;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = smooth::load_config(Path::new(&config_path))?;
    let image = load_rgb_image(&config.input)?;

    // eps is specified against unit-range guidance.
    let unit = scale(&image, 1.0 / 255.0);
    let opts = &config.guided;
    let smoothed = guided_filter_color(&unit, &unit, opts.radius, opts.eps, opts.subsample)
        .map_err(|e| e.to_string())?;

    save_rgb_f32(&scale(&smoothed, 255.0), &config.output)?;
    println!(
        "Saved smoothed image to {} (radius={} eps={} subsample={})",
        config.output.display(),
        opts.radius,
        opts.eps,
        opts.subsample
    );
    Ok(())
}

fn scale(image: &MultiImageF32, factor: f32) -> MultiImageF32 {
    let mut out = image.clone();
    out.data.iter_mut().for_each(|v| *v *= factor);
    out
}

fn usage() -> String {
    "Usage: guided_smooth <config.json>".to_string()
}
