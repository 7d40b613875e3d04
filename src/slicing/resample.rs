use super::{raster_dimensions, Quadrilateral, Raster, RasterDimensions};
use crate::config::SliceOptions;
use crate::volume::{Interpolation, MirroredX, Pixel, VoxelGrid, VoxelVolume};

/// Samples the volume over `quad`, one pixel per voxel step.
///
/// `None` if the quadrilateral is smaller than one voxel in either direction.
pub fn resample<P: Pixel>(
    volume: &VoxelGrid<P>,
    quad: &Quadrilateral,
    interpolation: Interpolation,
) -> Option<(RasterDimensions, Raster<P>)> {
    let options = SliceOptions {
        interpolation,
        ..Default::default()
    };
    resample_with_options(volume, quad, &options)
}

pub fn resample_with_options<P: Pixel>(
    volume: &VoxelGrid<P>,
    quad: &Quadrilateral,
    options: &SliceOptions,
) -> Option<(RasterDimensions, Raster<P>)> {
    let dimensions = raster_dimensions(quad, &volume.step_size())?;
    let raster = sample_raster(volume, quad, dimensions, options)?;
    Some((dimensions, raster))
}

/// Samples `quad` into a raster of the given `dimensions`, which need not match the volume's
/// resolution. Parts of the quadrilateral outside of the volume read as `P::SENTINEL`.
///
/// `None` if a raster of that size cannot be allocated.
pub fn sample_raster<P: Pixel>(
    volume: &VoxelGrid<P>,
    quad: &Quadrilateral,
    dimensions: RasterDimensions,
    options: &SliceOptions,
) -> Option<Raster<P>> {
    if options.mirror_x {
        walk(volume, &MirroredX::new(volume), quad, dimensions, options.interpolation)
    } else {
        walk(volume, volume, quad, dimensions, options.interpolation)
    }
}

/// Walks the raster over `quad`, starting at the corner the signs of `dimensions` select.
///
/// Positions are converted to indices with `grid`'s frame and read from `source`.
fn walk<P: Pixel, V: VoxelVolume<Pixel = P>>(
    grid: &VoxelGrid<P>,
    source: &V,
    quad: &Quadrilateral,
    dimensions: RasterDimensions,
    interpolation: Interpolation,
) -> Option<Raster<P>> {
    let width = dimensions.pixel_width();
    let height = dimensions.pixel_height();
    let mut raster = Raster::new(width, height)?;
    if width == 0 || height == 0 {
        return Some(raster);
    }

    let mut start = quad.lower_left;
    let mut x_step = quad.width_vector() / width as f64;
    let mut y_step = quad.height_vector() / height as f64;
    if dimensions.width < 0 {
        start += quad.width_vector();
        x_step = -x_step;
    }
    if dimensions.height < 0 {
        start += quad.height_vector();
        y_step = -y_step;
    }

    for py in 0..height {
        let row_start = start + y_step * py as f64;
        for px in 0..width {
            let position = row_start + x_step * px as f64;
            let index = grid.local_to_fractional_index(&position);
            raster.set(px, py, interpolation.sample(source, &index));
        }
    }
    Some(raster)
}
