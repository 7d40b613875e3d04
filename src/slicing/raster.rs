use super::Quadrilateral;
use crate::volume::Pixel;
use image::{GrayImage, Luma, RgbaImage};
use nalgebra::Vector3;

/// Pixel extent of a slice raster.
///
/// A negative sign means the raster runs against the corresponding quadrilateral edge: for a
/// negative `width` pixel column 0 sits at the right edge (`lower_right`) and columns advance
/// toward `lower_left`, likewise for `height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterDimensions {
    pub width: i32,
    pub height: i32,
}
impl RasterDimensions {
    pub fn pixel_width(&self) -> usize {
        self.width.unsigned_abs() as usize
    }
    pub fn pixel_height(&self) -> usize {
        self.height.unsigned_abs() as usize
    }
}

/// Number of voxel steps covered by `edge`, measured along the axis where it covers the most.
///
/// Ties between axes go to the lowest axis.
fn dominant_steps(edge: &Vector3<f64>, step_size: &Vector3<f64>) -> Option<i32> {
    let steps = edge.component_div(step_size).map(|s| s.round());
    if steps.iter().any(|s| !s.is_finite()) {
        return None;
    }
    let dominant = steps
        .iter()
        .copied()
        .fold(0.0f64, |best, s| if s.abs() > best.abs() { s } else { best });
    if dominant.abs() > i32::MAX as f64 {
        return None;
    }
    Some(dominant as i32)
}

/// Raster size for `quad` so that one pixel covers about one voxel.
///
/// `None` if the quadrilateral collapses to less than one voxel in either direction.
pub fn raster_dimensions(quad: &Quadrilateral, step_size: &Vector3<f64>) -> Option<RasterDimensions> {
    let height = dominant_steps(&quad.height_vector(), step_size)?;
    let width = dominant_steps(&quad.width_vector(), step_size)?;
    if width == 0 || height == 0 {
        log::trace!("slice raster collapses to {}x{}", width, height);
        return None;
    }
    Some(RasterDimensions { width, height })
}

/// Row-major pixel buffer, row 0 is the bottom row of the slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<P> {
    width: usize,
    height: usize,
    data: Vec<P>,
}
impl<P: Pixel> Raster<P> {
    /// A raster filled with `P::SENTINEL`, `None` if the buffer cannot be allocated.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        let len = width.checked_mul(height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, P::SENTINEL);
        Some(Self { width, height, data })
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn data(&self) -> &[P] {
        &self.data
    }
    pub fn into_data(self) -> Vec<P> {
        self.data
    }
    pub fn get(&self, x: usize, y: usize) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }
    pub fn set(&mut self, x: usize, y: usize, value: P) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }
    /// Raster row shown in image row `row`, images count rows from the top.
    fn image_row(&self, row: u32) -> usize {
        self.height - 1 - row as usize
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            self.data[self.image_row(y) * self.width + x as usize].to_rgba()
        })
    }
}
impl Raster<u8> {
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.data[self.image_row(y) * self.width + x as usize]])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use nalgebra::Point3;

    fn quad(height: Vector3<f64>, width: Vector3<f64>) -> Quadrilateral {
        let lower_left = Point3::new(1.0, 2.0, 3.0);
        Quadrilateral {
            upper_left: lower_left + height,
            lower_left,
            lower_right: lower_left + width,
            upper_right: lower_left + height + width,
        }
    }

    #[test]
    fn test_counts_steps_along_dominant_axis() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        let dims = raster_dimensions(&quad(Vector3::new(0.0, 10.0, 0.0), Vector3::new(10.0, 0.0, 0.0)), &unit).unwrap();
        assert_eq!(dims, RasterDimensions { width: 10, height: 10 });

        // finer steps along z win over the geometrically equal y extent
        let step = Vector3::new(1.0, 1.0, 0.5);
        let dims = raster_dimensions(&quad(Vector3::new(0.0, 10.0, 10.0), Vector3::new(10.0, 0.0, 0.0)), &step).unwrap();
        assert_eq!(dims, RasterDimensions { width: 10, height: 20 });
    }

    #[test]
    fn test_keeps_sign_and_prefers_lowest_axis_on_ties() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        let dims = raster_dimensions(&quad(Vector3::new(0.0, 4.0, 0.0), Vector3::new(-10.0, 0.0, 0.0)), &unit).unwrap();
        assert_eq!(dims, RasterDimensions { width: -10, height: 4 });
        assert_eq!(dims.pixel_width(), 10);

        let dims = raster_dimensions(&quad(Vector3::new(0.0, -5.0, 5.0), Vector3::new(-3.0, 0.0, 3.0)), &unit).unwrap();
        assert_eq!(dims, RasterDimensions { width: -3, height: -5 });
    }

    #[test]
    fn test_collapsed_quads_have_no_raster() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        assert!(raster_dimensions(&quad(Vector3::new(0.0, 0.4, 0.0), Vector3::new(10.0, 0.0, 0.0)), &unit).is_none());
        assert!(raster_dimensions(&quad(Vector3::new(0.0, 10.0, 0.0), Vector3::zeros()), &unit).is_none());
    }

    #[test]
    fn test_raster_access() {
        let mut raster = Raster::<u8>::new(3, 2).unwrap();
        assert_eq!(raster.data(), &[0u8; 6]);
        raster.set(2, 1, 7);
        raster.set(3, 0, 9);
        assert_eq!(raster.get(2, 1), Some(7));
        assert_eq!(raster.get(3, 0), None);
        assert_eq!(raster.into_data(), vec![0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_oversized_raster_is_refused() {
        assert!(Raster::<u8>::new(usize::MAX, 2).is_none());
        assert!(Raster::<f32>::new(usize::MAX / 2, usize::MAX / 2).is_none());
        assert_eq!(Raster::<u8>::new(0, 5).unwrap().data().len(), 0);
    }

    #[test]
    fn test_images_put_bottom_row_last() {
        let mut raster = Raster::<u8>::new(2, 2).unwrap();
        raster.set(0, 0, 10);
        raster.set(1, 1, 200);

        let gray = raster.to_gray_image();
        assert_eq!(gray.get_pixel(0, 1), &Luma([10]));
        assert_eq!(gray.get_pixel(1, 0), &Luma([200]));

        let rgba = raster.to_rgba_image();
        assert_eq!(rgba.dimensions(), (2, 2));
        assert_eq!(rgba.get_pixel(0, 1), &Rgba([10, 10, 10, 255]));
        assert_eq!(rgba.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }
}
