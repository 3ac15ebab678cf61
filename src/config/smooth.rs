use super::read_json;
use crate::guided::GuidedFilterOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct SmoothToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub guided: GuidedFilterOptions,
    pub output: PathBuf,
}

pub fn load_config(path: &Path) -> Result<SmoothToolConfig, String> {
    read_json(path)
}
