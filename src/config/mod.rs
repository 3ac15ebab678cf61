//! JSON configuration for the bundled command-line tools.
//!
//! Every section is optional except the input path and the outputs; missing
//! fields take the library defaults.

pub mod enhance;
pub mod smooth;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
