use super::{VolumeMeta, VoxelGrid};
use anyhow::{anyhow, bail, Context, Result};
use memmap::MmapOptions;
use std::fs::File;
use std::path::Path;

/// Loads an uncompressed 8-bit volume stored in `x + y * X + z * X * Y` order.
pub fn load_raw(path: &Path, dimensions: [usize; 3], meta: &VolumeMeta) -> Result<VoxelGrid<u8>> {
    let expected = dimensions
        .iter()
        .try_fold(1usize, |acc, &c| acc.checked_mul(c))
        .ok_or_else(|| anyhow!("Volume dimensions {:?} overflow", dimensions))?;
    if expected == 0 {
        bail!("Volume dimensions must not be empty: {:?}", dimensions);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file.metadata()?.len();
    if len != expected as u64 {
        bail!(
            "file {} has wrong size {}, expected {} for dimensions {:?}",
            path.display(),
            len,
            expected,
            dimensions
        );
    }
    let map = unsafe { MmapOptions::new().map(&file) }.with_context(|| format!("Failed to map {}", path.display()))?;
    log::info!("Loaded raw volume {} with dimensions {:?}", path.display(), dimensions);

    VoxelGrid::new(dimensions, map.to_vec(), meta.size_for(dimensions), meta.center())
}
