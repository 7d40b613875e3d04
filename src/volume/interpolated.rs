use super::{Pixel, VoxelVolume};
use libm::modf;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// How a fractional index position is turned into a pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Round to the closest voxel.
    #[default]
    Nearest,
    /// Blend the eight surrounding voxels.
    Trilinear,
}

impl Interpolation {
    /// Samples `volume` at `index`, a position in (fractional) index space.
    pub fn sample<V: VoxelVolume>(self, volume: &V, index: &Vector3<f64>) -> V::Pixel {
        match self {
            Interpolation::Nearest => volume.get([index.x, index.y, index.z].map(|i| i.round() as i32)),
            Interpolation::Trilinear => trilinear(volume, index),
        }
    }
}

/// Integer part and positive fraction, so that `whole + frac == v` with `frac` in `[0, 1)`.
fn split(v: f64) -> (i32, f64) {
    let (frac, whole) = modf(v);
    if frac < 0.0 {
        ((whole as i32).saturating_sub(1), frac + 1.0)
    } else {
        (whole as i32, frac)
    }
}

fn trilinear<V: VoxelVolume>(volume: &V, index: &Vector3<f64>) -> V::Pixel {
    let (x0, dx) = split(index.x);
    let (y0, dy) = split(index.y);
    let (z0, dz) = split(index.z);
    let x1 = x0.saturating_add(1);
    let y1 = y0.saturating_add(1);
    let z1 = z0.saturating_add(1);

    let c00 = volume.get([x0, y0, z0]).lerp(volume.get([x1, y0, z0]), dx);
    let c10 = volume.get([x0, y1, z0]).lerp(volume.get([x1, y1, z0]), dx);
    let c01 = volume.get([x0, y0, z1]).lerp(volume.get([x1, y0, z1]), dx);
    let c11 = volume.get([x0, y1, z1]).lerp(volume.get([x1, y1, z1]), dx);

    let c0 = c00.lerp(c10, dy);
    let c1 = c01.lerp(c11, dy);

    c0.lerp(c1, dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VoxelGrid;
    use nalgebra::Point3;

    fn ramp() -> VoxelGrid<u8> {
        // value grows by 10 along x, by 100 along z
        VoxelGrid::from_fn([3, 2, 2], Vector3::new(3.0, 2.0, 2.0), Point3::origin(), |[x, _, z]| {
            (10 * x + 100 * z) as u8
        })
        .unwrap()
    }

    #[test]
    fn test_split_handles_negative_values() {
        assert_eq!(split(2.25), (2, 0.25));
        assert_eq!(split(-0.25), (-1, 0.75));
        assert_eq!(split(-2.0), (-2, 0.0));
    }

    #[test]
    fn test_nearest_rounds() {
        let grid = ramp();
        assert_eq!(Interpolation::Nearest.sample(&grid, &Vector3::new(1.4, 0.0, 0.0)), 10);
        assert_eq!(Interpolation::Nearest.sample(&grid, &Vector3::new(1.6, 0.0, 0.6)), 120);
        assert_eq!(Interpolation::Nearest.sample(&grid, &Vector3::new(-0.6, 0.0, 0.0)), 0);
    }

    #[test]
    fn test_trilinear_matches_nearest_on_voxel_centers() {
        let grid = ramp();
        for [x, y, z] in [[0, 0, 0], [2, 1, 1], [1, 0, 1]] {
            let index = Vector3::new(x as f64, y as f64, z as f64);
            assert_eq!(
                Interpolation::Trilinear.sample(&grid, &index),
                Interpolation::Nearest.sample(&grid, &index)
            );
        }
    }

    #[test]
    fn test_trilinear_blends_neighbours() {
        let grid = ramp();
        assert_eq!(Interpolation::Trilinear.sample(&grid, &Vector3::new(0.5, 0.0, 0.0)), 5);
        assert_eq!(Interpolation::Trilinear.sample(&grid, &Vector3::new(1.0, 0.5, 0.5)), 60);
        // half way out of the grid blends with the sentinel
        assert_eq!(Interpolation::Trilinear.sample(&grid, &Vector3::new(2.5, 0.0, 0.0)), 10);
    }

    #[test]
    fn test_deserializes_lowercase() {
        let i: Interpolation = serde_json::from_str("\"trilinear\"").unwrap();
        assert_eq!(i, Interpolation::Trilinear);
    }
}
