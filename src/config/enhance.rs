use super::read_json;
use crate::airlight::AirlightOptions;
use crate::transmission::TransmissionOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EnhanceToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub airlight: AirlightOptions,
    #[serde(default)]
    pub transmission: TransmissionOptions,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    pub output: EnhanceOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Floor applied to the transmission before dividing by it.
    pub min_transmission: f32,
    /// Run simplest colour balance on the result with this percentage.
    pub balance_percent: Option<f32>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            min_transmission: 0.1,
            balance_percent: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EnhanceOutputConfig {
    pub image: PathBuf,
    pub transmission: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<EnhanceToolConfig, String> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_take_defaults() {
        let json = r#"{
            "input": "in.png",
            "transmission": { "patch_size": 4, "refine": { "radius": 8 } },
            "output": { "image": "out.png" }
        }"#;
        let cfg: EnhanceToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.airlight.block_area, 10_000);
        assert_eq!(cfg.transmission.patch_size, 4);
        assert_eq!(cfg.transmission.lambda, 5.0);
        let refine = cfg.transmission.refine.unwrap();
        assert_eq!(refine.radius, 8);
        assert_eq!(refine.detail_kernel, 81);
        assert_eq!(cfg.recovery.min_transmission, 0.1);
        assert!(cfg.output.transmission.is_none());
    }
}
