//! Physical layout of a dataset, read from a `meta.json` next to the voxel data.

use anyhow::{bail, Context, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumeMeta {
    /// Extent of a single voxel in local units along x, y, z.
    pub voxel_size: [f64; 3],
    /// Center of the volume's bounding box in local units.
    pub center: [f64; 3],
}
impl Default for VolumeMeta {
    fn default() -> Self {
        Self {
            voxel_size: [1.0, 1.0, 1.0],
            center: [0.0, 0.0, 0.0],
        }
    }
}
impl VolumeMeta {
    pub fn from_json(json: &str) -> Result<Self> {
        let meta: VolumeMeta = serde_json::from_str(json)?;
        if meta.voxel_size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            bail!("voxel_size must be positive but was {:?}", meta.voxel_size);
        }
        Ok(meta)
    }

    /// `meta.json` inside a layer directory, `<name>.json` beside a single data file.
    pub fn path_for(dataset: &Path) -> PathBuf {
        if dataset.is_dir() {
            dataset.join("meta.json")
        } else {
            dataset.with_extension("json")
        }
    }

    /// Reads the metadata belonging to `dataset`, falling back to the defaults if there is none.
    pub fn load_beside(dataset: &Path) -> Result<Self> {
        let path = Self::path_for(dataset);
        if !path.exists() {
            log::debug!("No metadata at {}, using unit voxels", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid metadata in {}", path.display()))
    }

    pub fn size_for(&self, dimensions: [usize; 3]) -> Vector3<f64> {
        Vector3::from(self.voxel_size).component_mul(&Vector3::new(
            dimensions[0] as f64,
            dimensions[1] as f64,
            dimensions[2] as f64,
        ))
    }
    pub fn center(&self) -> Point3<f64> {
        Point3::from(self.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let meta = VolumeMeta::from_json(r#"{ "voxel_size": [0.5, 0.5, 2.0] }"#).unwrap();
        assert_eq!(meta.center, [0.0, 0.0, 0.0]);
        assert_relative_eq!(meta.size_for([10, 4, 3]), Vector3::new(5.0, 2.0, 6.0));
        assert!(VolumeMeta::from_json(r#"{ "voxel_size": [0.5, 0.0, 2.0] }"#).is_err());
    }

    #[test]
    fn test_load_beside() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(VolumeMeta::load_beside(dir.path()).unwrap(), VolumeMeta::default());

        std::fs::write(dir.path().join("meta.json"), r#"{ "center": [1, 2, 3] }"#).unwrap();
        assert_relative_eq!(VolumeMeta::load_beside(dir.path()).unwrap().center(), Point3::new(1.0, 2.0, 3.0));

        let raw = dir.path().join("scan.raw");
        std::fs::write(&raw, [0u8; 8]).unwrap();
        std::fs::write(dir.path().join("scan.json"), r#"{ "voxel_size": [3, 3, 3] }"#).unwrap();
        assert_eq!(VolumeMeta::load_beside(&raw).unwrap().voxel_size, [3.0, 3.0, 3.0]);
    }
}
