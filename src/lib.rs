#![doc = include_str!("../README.md")]

// Core building blocks
pub mod block;
pub mod error;
pub mod filters;
pub mod image;

// Estimators and transforms
pub mod airlight;
pub mod dehaze;
pub mod guided;
pub mod pyramid;
pub mod transmission;

// Tool support (JSON configs for the bundled binaries).
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::airlight::{estimate_airlight, Airlight, AirlightOptions};
pub use crate::block::Block;
pub use crate::dehaze::recover_radiance;
pub use crate::error::RestoreError;
pub use crate::guided::{guided_filter, guided_filter_color, GuidedFilterOptions};
pub use crate::image::{ImageF32, MultiImageF32};
pub use crate::pyramid::{fuse_pyramids, FusionOptions, PyramidOptions};
pub use crate::transmission::{
    estimate_transmission, estimate_transmission_per_channel, RefineOptions,
    TransmissionOptions,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use restoration_core::prelude::*;
///
/// # fn main() -> Result<(), RestoreError> {
/// let hazy = MultiImageF32::from_pixel(320, 240, &[180.0, 190.0, 200.0]);
/// let airlight = estimate_airlight(&hazy, 10_000)?;
/// let opts = TransmissionOptions::new(8, 5.0, 0.3).with_refine(RefineOptions::default());
/// let t = estimate_transmission(&hazy, &airlight.values, &opts)?;
/// let clear = recover_radiance(&hazy, &t, &airlight.values, 0.1)?;
/// println!("restored {}x{}", clear.w, clear.h);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, MultiImageF32};
    pub use crate::{
        estimate_airlight, estimate_transmission, estimate_transmission_per_channel,
        fuse_pyramids, guided_filter, guided_filter_color, recover_radiance, RefineOptions,
        RestoreError, TransmissionOptions,
    };
}
