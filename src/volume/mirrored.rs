use super::VoxelVolume;

/// View of a volume with the x axis reversed.
///
/// Index `x` reads voxel `x_count - 1 - x`, so column 0 maps to the last column and the
/// view covers exactly the base grid. `x_count - x` would read one column past the edge.
pub struct MirroredX<'a, V> {
    base: &'a V,
}
impl<'a, V: VoxelVolume> MirroredX<'a, V> {
    pub fn new(base: &'a V) -> Self {
        Self { base }
    }
}

impl<V: VoxelVolume> VoxelVolume for MirroredX<'_, V> {
    type Pixel = V::Pixel;

    fn dimensions(&self) -> [usize; 3] {
        self.base.dimensions()
    }
    fn get(&self, xyz: [i32; 3]) -> V::Pixel {
        let x_count = self.base.dimensions()[0] as i32;
        self.base.get([(x_count - 1).saturating_sub(xyz[0]), xyz[1], xyz[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VoxelGrid;

    #[test]
    fn test_mirrors_x_only() {
        let grid = VoxelGrid::with_unit_voxels([3, 2, 1], vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        let mirrored = MirroredX::new(&grid);
        assert_eq!(mirrored.get([0, 0, 0]), 3);
        assert_eq!(mirrored.get([2, 0, 0]), 1);
        assert_eq!(mirrored.get([1, 1, 0]), 5);
        assert_eq!(mirrored.get([0, 1, 0]), 6);
        // outside of the grid on either side
        assert_eq!(mirrored.get([3, 0, 0]), 0);
        assert_eq!(mirrored.get([-1, 0, 0]), 0);
        assert_eq!(mirrored.dimensions(), [3, 2, 1]);
    }
}
