use crate::filters::{SeparableFilter, StaticSeparableFilter, GAUSSIAN_5TAP};

use serde::Deserialize;

/// Options controlling pyramid construction and fusion.
#[derive(Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PyramidOptions {
    /// Number of pyramid levels (>= 1).
    pub levels: usize,
    /// Low-pass filter applied to every weight level.
    #[serde(skip)]
    pub filter: StaticSeparableFilter,
}

/// Fusion is configured entirely through the pyramid options.
pub type FusionOptions = PyramidOptions;

impl Default for PyramidOptions {
    fn default() -> Self {
        Self::new(5)
    }
}

impl PyramidOptions {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            filter: GAUSSIAN_5TAP,
        }
    }
}

impl std::fmt::Debug for PyramidOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyramidOptions")
            .field("levels", &self.levels)
            .field("filter_taps", &self.filter.taps().len())
            .finish()
    }
}
