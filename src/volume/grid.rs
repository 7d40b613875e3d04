use super::{Pixel, VoxelVolume};
use anyhow::{anyhow, bail, Result};
use derive_more::Debug;
use nalgebra::{Point3, Vector3};

/// The eight corners of the volume's bounding box.
///
/// x runs left to right, y bottom to top and z front to back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    BottomFrontLeft,
    BottomFrontRight,
    BottomBackLeft,
    BottomBackRight,
    TopFrontLeft,
    TopFrontRight,
    TopBackLeft,
    TopBackRight,
}
impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner::BottomFrontLeft,
        Corner::BottomFrontRight,
        Corner::BottomBackLeft,
        Corner::BottomBackRight,
        Corner::TopFrontLeft,
        Corner::TopFrontRight,
        Corner::TopBackLeft,
        Corner::TopBackRight,
    ];

    /// Whether this corner sits on the maximum side of the x, y and z axis.
    pub fn max_side(self) -> [bool; 3] {
        match self {
            Corner::BottomFrontLeft => [false, false, false],
            Corner::BottomFrontRight => [true, false, false],
            Corner::BottomBackLeft => [false, false, true],
            Corner::BottomBackRight => [true, false, true],
            Corner::TopFrontLeft => [false, true, false],
            Corner::TopFrontRight => [true, true, false],
            Corner::TopBackLeft => [false, true, true],
            Corner::TopBackRight => [true, true, true],
        }
    }
    fn index(self) -> usize {
        self as usize
    }
}

/// A fully resident voxel grid together with its local geometric frame.
///
/// Samples are stored flat in `x + y * x_count + z * x_count * y_count` order. Voxel `i`
/// along an axis is centered at `bottom_front_left + i * step_size`.
#[derive(Debug, Clone)]
pub struct VoxelGrid<P> {
    dimensions: [usize; 3],
    #[debug(skip)]
    samples: Vec<P>,
    size: Vector3<f64>,
    step_size: Vector3<f64>,
    center: Point3<f64>,
    corners: [Point3<f64>; 8],
}

impl<P: Pixel> VoxelGrid<P> {
    pub fn new(dimensions: [usize; 3], samples: Vec<P>, size: Vector3<f64>, center: Point3<f64>) -> Result<Self> {
        if dimensions.iter().any(|&c| c == 0) {
            bail!("Volume dimensions must not be empty: {:?}", dimensions);
        }
        if dimensions.iter().any(|&c| c > i32::MAX as usize) {
            bail!("Volume dimensions {:?} exceed the addressable index range", dimensions);
        }
        let expected = dimensions
            .iter()
            .try_fold(1usize, |acc, &c| acc.checked_mul(c))
            .ok_or_else(|| anyhow!("Volume dimensions {:?} overflow", dimensions))?;
        if samples.len() != expected {
            bail!(
                "Expected {} samples for dimensions {:?} but got {}",
                expected,
                dimensions,
                samples.len()
            );
        }
        if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            bail!("Volume size must be positive and finite but was {:?}", size.as_slice());
        }
        if center.iter().any(|c| !c.is_finite()) {
            bail!("Volume center must be finite but was {:?}", center.coords.as_slice());
        }

        let counts = Vector3::new(dimensions[0] as f64, dimensions[1] as f64, dimensions[2] as f64);
        let step_size = size.component_div(&counts);

        let half = size / 2.0;
        let corners = Corner::ALL.map(|corner| {
            let [x, y, z] = corner.max_side();
            let pick = |max: bool, i: usize| if max { half[i] } else { -half[i] };
            center + Vector3::new(pick(x, 0), pick(y, 1), pick(z, 2))
        });

        Ok(Self {
            dimensions,
            samples,
            size,
            step_size,
            center,
            corners,
        })
    }

    /// A grid with unit sized voxels centered at the local origin.
    pub fn with_unit_voxels(dimensions: [usize; 3], samples: Vec<P>) -> Result<Self> {
        let size = Vector3::new(dimensions[0] as f64, dimensions[1] as f64, dimensions[2] as f64);
        Self::new(dimensions, samples, size, Point3::origin())
    }

    /// Builds a grid by evaluating `f` for every voxel index.
    pub fn from_fn(
        dimensions: [usize; 3],
        size: Vector3<f64>,
        center: Point3<f64>,
        mut f: impl FnMut([usize; 3]) -> P,
    ) -> Result<Self> {
        let [xc, yc, zc] = dimensions;
        let mut samples = Vec::with_capacity(xc.saturating_mul(yc).saturating_mul(zc));
        for z in 0..zc {
            for y in 0..yc {
                for x in 0..xc {
                    samples.push(f([x, y, z]));
                }
            }
        }
        Self::new(dimensions, samples, size, center)
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }
    pub fn samples(&self) -> &[P] {
        &self.samples
    }
    pub fn size(&self) -> Vector3<f64> {
        self.size
    }
    pub fn step_size(&self) -> Vector3<f64> {
        self.step_size
    }
    pub fn center(&self) -> Point3<f64> {
        self.center
    }
    pub fn corner(&self, corner: Corner) -> Point3<f64> {
        self.corners[corner.index()]
    }
    pub fn corners(&self) -> [Point3<f64>; 8] {
        Corner::ALL.map(|c| self.corner(c))
    }
    pub fn bottom_front_left(&self) -> Point3<f64> {
        self.corner(Corner::BottomFrontLeft)
    }

    /// All samples of layer `z`, i.e. one source image.
    pub fn layer(&self, z: usize) -> Option<&[P]> {
        let layer_len = self.dimensions[0] * self.dimensions[1];
        let start = z.checked_mul(layer_len)?;
        self.samples.get(start..start.checked_add(layer_len)?)
    }

    pub fn contains_index(&self, xyz: [i32; 3]) -> bool {
        xyz.iter()
            .zip(self.dimensions.iter())
            .all(|(&i, &count)| i >= 0 && (i as usize) < count)
    }

    /// The voxel at `xyz` or `P::SENTINEL` if `xyz` lies outside of the grid.
    pub fn sample(&self, xyz: [i32; 3]) -> P {
        if !self.contains_index(xyz) {
            return P::SENTINEL;
        }
        let [x, y, z] = xyz.map(|i| i as usize);
        self.samples[x + y * self.dimensions[0] + z * self.dimensions[0] * self.dimensions[1]]
    }

    /// Position in index space, not rounded.
    pub fn local_to_fractional_index(&self, position: &Point3<f64>) -> Vector3<f64> {
        (position - self.bottom_front_left()).component_div(&self.step_size)
    }

    /// Nearest voxel for a local position. Rounds so that sample centers align with voxel centers.
    pub fn local_to_index(&self, position: &Point3<f64>) -> [i32; 3] {
        let index = self.local_to_fractional_index(position);
        [index.x, index.y, index.z].map(|i| i.round() as i32)
    }

    pub fn index_to_local(&self, xyz: [i32; 3]) -> Point3<f64> {
        let index = Vector3::new(xyz[0] as f64, xyz[1] as f64, xyz[2] as f64);
        self.bottom_front_left() + index.component_mul(&self.step_size)
    }
}

impl<P: Pixel> VoxelVolume for VoxelGrid<P> {
    type Pixel = P;

    fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }
    fn get(&self, xyz: [i32; 3]) -> P {
        self.sample(xyz)
    }
}
