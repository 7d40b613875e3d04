use crate::volume::Interpolation;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Per-slice sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceOptions {
    pub interpolation: Interpolation,
    /// Read the volume with its x axis reversed.
    pub mirror_x: bool,
}

impl SliceOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
    /// Parses either inline JSON or a path to a JSON file, depending on whether the input starts with "{" or not
    pub fn from_json_or_path(json_or_path: &str) -> Result<Self> {
        let json_or_path = json_or_path.trim();
        if json_or_path.starts_with('{') {
            Self::from_json(json_or_path)
        } else {
            let json = std::fs::read_to_string(json_or_path)
                .with_context(|| format!("Failed to read slice options from {}", json_or_path))?;
            Self::from_json(&json).with_context(|| format!("Invalid slice options in {}", json_or_path))
        }
    }
}
