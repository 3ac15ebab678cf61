use serde::Deserialize;

/// Parameters of the block-wise transmission search.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TransmissionOptions {
    /// Side of the square tiles, in pixels (> 0). Border tiles are clipped.
    pub patch_size: usize,
    /// Weight of the information-loss term against the contrast term.
    pub lambda: f64,
    /// First candidate; candidates advance by 0.1 towards 1.
    pub initial_transmission: f64,
    /// Guided refinement and detail boost; `None` keeps the blocky map.
    pub refine: Option<RefineOptions>,
}

impl Default for TransmissionOptions {
    fn default() -> Self {
        Self {
            patch_size: 8,
            lambda: 5.0,
            initial_transmission: 0.3,
            refine: None,
        }
    }
}

impl TransmissionOptions {
    pub fn new(patch_size: usize, lambda: f64, initial_transmission: f64) -> Self {
        Self {
            patch_size,
            lambda,
            initial_transmission,
            refine: None,
        }
    }

    pub fn with_refine(mut self, refine: RefineOptions) -> Self {
        self.refine = Some(refine);
        self
    }
}

/// Edge-aware refinement of a transmission map.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Guided filter window side.
    pub radius: usize,
    /// Guided filter regulariser, relative to guidance in [0, 1].
    pub eps: f64,
    /// Gain applied to the high-frequency detail of the refined map.
    pub gamma: f32,
    /// Odd size of the Gaussian that separates base from detail.
    pub detail_kernel: usize,
    pub detail_sigma: f64,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            radius: 20,
            eps: 0.001,
            gamma: 1.0,
            detail_kernel: 81,
            detail_sigma: 40.0,
        }
    }
}

impl RefineOptions {
    pub fn new(radius: usize, eps: f64, gamma: f32) -> Self {
        Self {
            radius,
            eps,
            gamma,
            ..Default::default()
        }
    }

    pub fn with_detail_kernel(mut self, size: usize, sigma: f64) -> Self {
        self.detail_kernel = size;
        self.detail_sigma = sigma;
        self
    }
}
