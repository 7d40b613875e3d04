mod grid;
mod interpolated;
mod layers;
mod meta;
mod mirrored;
mod pixel;
mod raw;
mod transform;

pub use grid::{Corner, VoxelGrid};
pub use interpolated::Interpolation;
pub use layers::load_layers;
pub use meta::VolumeMeta;
pub use mirrored::MirroredX;
pub use pixel::Pixel;
pub use raw::load_raw;
pub use transform::VolumeTransform;

/// Integer indexed access to voxel data.
///
/// Indices outside of `dimensions` must not fail but return `Pixel::SENTINEL`.
pub trait VoxelVolume {
    type Pixel: Pixel;

    fn dimensions(&self) -> [usize; 3];
    fn get(&self, xyz: [i32; 3]) -> Self::Pixel;
}
