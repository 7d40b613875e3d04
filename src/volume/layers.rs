use super::{VolumeMeta, VoxelGrid};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Finds the numbered layer images in `data_dir`, sorted by layer number.
///
/// Names like `00000.tif`, `layer_012.png` or `slice-7.jpg` are accepted, the last number in
/// the file stem is the layer index.
fn find_layers(data_dir: &Path) -> Result<Vec<(usize, PathBuf)>> {
    let pattern = regex::Regex::new(r"(\d+)\.(tif|tiff|png|jpe?g)$")?;

    let mut layers = vec![];
    for entry in std::fs::read_dir(data_dir).with_context(|| format!("Cannot list {}", data_dir.display()))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(captures) = pattern.captures(&file_name.to_ascii_lowercase()) {
            let z = captures[1]
                .parse::<usize>()
                .with_context(|| format!("Layer number of {} is out of range", file_name))?;
            layers.push((z, path));
        } else {
            log::trace!("Skipping {} in {}", file_name, data_dir.display());
        }
    }
    layers.sort();

    for pair in layers.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.0 == b.0 {
            bail!("Layer {} found twice: {} and {}", a.0, a.1.display(), b.1.display());
        }
        if b.0 != a.0 + 1 {
            bail!("Layers {}..{} are missing in {}", a.0 + 1, b.0, data_dir.display());
        }
    }
    Ok(layers)
}

/// Loads a stack of 2D images as a volume, one layer per image and one voxel per pixel.
///
/// Images are converted to 8-bit gray. Image row 0 is the top of the picture and becomes the
/// highest y index, so that a slice along z reads back like the source image.
pub fn load_layers(data_dir: &Path, meta: &VolumeMeta) -> Result<VoxelGrid<u8>> {
    if !data_dir.is_dir() {
        bail!("Data directory {} does not exist", data_dir.display());
    }
    let layers = find_layers(data_dir)?;
    if layers.is_empty() {
        bail!("No layer images found in {}", data_dir.display());
    }

    let images = layers
        .par_iter()
        .map(|(_, path)| {
            image::open(path)
                .with_context(|| format!("Failed to decode {}", path.display()))
                .map(|image| image.into_luma8())
        })
        .collect::<Result<Vec<_>>>()?;

    let (width, height) = images[0].dimensions();
    if width == 0 || height == 0 {
        bail!("Layer images in {} are empty", data_dir.display());
    }
    for (image, (z, path)) in images.iter().zip(layers.iter()) {
        if image.dimensions() != (width, height) {
            bail!(
                "Layer {} ({}) is {:?} but the first layer is {:?}",
                z,
                path.display(),
                image.dimensions(),
                (width, height)
            );
        }
    }
    let dimensions = [width as usize, height as usize, images.len()];
    log::info!("Found {} layers in {}", layers.len(), data_dir.display());
    log::info!("dimensions: {:?}", dimensions);

    let mut samples = Vec::with_capacity(dimensions.iter().product());
    for image in &images {
        for row in image.as_raw().chunks_exact(dimensions[0]).rev() {
            samples.extend_from_slice(row);
        }
    }

    VoxelGrid::new(dimensions, samples, meta.size_for(dimensions), meta.center())
}
