//! Low-level image filters shared by the estimators, the guided filter and
//! the pyramid.
//!
//! All filters are pure: they read their input by reference and return a new
//! buffer. Borders are handled by clamping (replicate border) unless noted.

pub mod box_filter;
pub mod color;
pub mod resize;
pub mod separable;

pub use box_filter::box_mean_f64;
pub use color::{luminance, simplest_color_balance};
pub use resize::{half_size, resize_bilinear, resize_nearest};
pub use separable::{
    apply as apply_separable, GaussianKernel, SeparableFilter, StaticSeparableFilter,
    GAUSSIAN_5TAP,
};
