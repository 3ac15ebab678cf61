//! Gaussian / Laplacian pyramids and two-image multiresolution fusion.
//!
//! Purpose
//! - Blend two renditions of the same scene with per-pixel weights without
//!   the seams and halos a direct per-pixel blend produces. Blending happens
//!   per band: every Laplacian level of each image is weighted by the matching
//!   Gaussian level of its weight map, then the fused bands are collapsed.
//!
//! Design
//! - Level 0 is full resolution; each next level is `ceil(n / 2)` per axis
//!   (never below 1), resampled bilinearly with half-pixel centres.
//! - Gaussian level `i` is the `i`-times halved map blurred with the separable
//!   5-tap kernel `[1, 4, 6, 4, 1] / 16` (border clamped).
//! - Laplacian level `i < L-1` is `level_i − up(level_{i+1})`; the coarsest
//!   level keeps the low-pass image itself, so collapsing is exact.
//!
//! Complexity
//! - Per level O(W·H); memory about 4/3 of one image per pyramid.

mod build;
mod fusion;
pub mod options;

pub use build::{collapse_laplacian, gaussian_pyramid, laplacian_pyramid, Pyramid};
pub use fusion::{fuse_pyramids, fuse_pyramids_with};
pub use options::{FusionOptions, PyramidOptions};
