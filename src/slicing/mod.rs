//! Planar cross-sections through a voxel grid.
//!
//! A slice is computed in three steps: the cutting plane is intersected with the twelve
//! edges of the volume's bounding box, the hits are reduced to the bounding rectangle as seen
//! by a viewer looking along the plane normal, and that rectangle is resampled into a raster
//! at voxel resolution.

mod intersect;
mod quad;
mod raster;
mod resample;

pub use intersect::{box_edges, intersect_edges, BoxEdge};
pub use quad::{reduce, signed_distance_along_axis, Quadrilateral};
pub use raster::{raster_dimensions, Raster, RasterDimensions};
pub use resample::{resample, resample_with_options, sample_raster};

use crate::config::SliceOptions;
use crate::model::Plane;
use crate::volume::{Pixel, VolumeTransform, VoxelGrid};
use nalgebra::{Point3, Vector3};

/// Relative tolerance of the edge hit tests.
pub(crate) const EPSILON: f64 = 1e-9;

/// The bounding rectangle of the cross-section of `volume` with the plane through
/// `plane_position` with normal `plane_normal`, all in the volume's local frame.
///
/// `None` if the plane misses the volume, only grazes it, or `plane_normal` is degenerate.
pub fn compute_intersection<P: Pixel>(
    volume: &VoxelGrid<P>,
    plane_position: &Point3<f64>,
    plane_normal: &Vector3<f64>,
) -> Option<Quadrilateral> {
    let Some(plane) = Plane::new(*plane_position, *plane_normal) else {
        log::debug!("degenerate plane normal {:?}", plane_normal.as_slice());
        return None;
    };
    let points = intersect_edges(volume, &plane)?;
    reduce(&points, &plane.normal)
}

/// A fully computed cross-section.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice<P> {
    pub quad: Quadrilateral,
    pub dimensions: RasterDimensions,
    pub raster: Raster<P>,
}

/// Intersects and resamples in one go, `plane` is given in the volume's local frame.
pub fn slice<P: Pixel>(volume: &VoxelGrid<P>, plane: &Plane, options: &SliceOptions) -> Option<Slice<P>> {
    let points = intersect_edges(volume, plane)?;
    let quad = reduce(&points, &plane.normal)?;
    let (dimensions, raster) = resample_with_options(volume, &quad, options)?;
    log::debug!(
        "slice at {:?} facing {:?}: {}x{} pixels",
        plane.position.coords.as_slice(),
        plane.normal.as_slice(),
        dimensions.width,
        dimensions.height
    );
    Some(Slice {
        quad,
        dimensions,
        raster,
    })
}

/// Like [`slice`] for a volume placed in the world with `transform` and a plane given in world
/// coordinates. The returned quadrilateral is in world coordinates as well.
pub fn slice_world<P: Pixel>(
    volume: &VoxelGrid<P>,
    transform: &VolumeTransform,
    world_plane: &Plane,
    options: &SliceOptions,
) -> Option<Slice<P>> {
    let local_plane = transform.world_to_local_plane(world_plane)?;
    let mut slice = slice(volume, &local_plane, options)?;
    slice.quad = slice.quad.to_world(transform);
    Some(slice)
}

/// `count` planes parallel to `plane`, evenly spread over the volume's extent along the normal.
///
/// Each plane sits in the middle of its share of the extent, so none of them merely touches
/// the volume.
pub fn sweep_planes<P: Pixel>(volume: &VoxelGrid<P>, plane: &Plane, count: usize) -> Vec<Plane> {
    let (min, max) = volume
        .corners()
        .iter()
        .map(|corner| plane.signed_distance(corner))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| (min.min(d), max.max(d)));

    (0..count)
        .map(|i| {
            let offset = min + (max - min) * (i as f64 + 0.5) / count as f64;
            Plane::from_unit(plane.position + plane.normal.into_inner() * offset, plane.normal)
        })
        .collect()
}
