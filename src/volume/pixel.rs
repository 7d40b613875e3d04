use image::Rgba;
use std::fmt::Debug;

/// A single voxel / raster value.
///
/// `SENTINEL` is what the volume hands out for indices outside of the grid, so it must be
/// the "nothing here" value of the type (black for intensities, fully transparent for RGBA).
pub trait Pixel: Copy + PartialEq + Debug + Send + Sync + 'static {
    const SENTINEL: Self;

    /// Linear blend, `t == 0.0` yields `self`, `t == 1.0` yields `other`.
    fn lerp(self, other: Self, t: f64) -> Self;

    /// 8-bit RGBA view used when writing images.
    fn to_rgba(self) -> Rgba<u8>;
}

impl Pixel for u8 {
    const SENTINEL: Self = 0;

    fn lerp(self, other: Self, t: f64) -> Self {
        (self as f64 + (other as f64 - self as f64) * t).round() as u8
    }
    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self, self, self, 255])
    }
}

impl Pixel for u16 {
    const SENTINEL: Self = 0;

    fn lerp(self, other: Self, t: f64) -> Self {
        (self as f64 + (other as f64 - self as f64) * t).round() as u16
    }
    fn to_rgba(self) -> Rgba<u8> {
        // only the higher order bits are shown
        let v = (self >> 8) as u8;
        Rgba([v, v, v, 255])
    }
}

impl Pixel for f32 {
    const SENTINEL: Self = 0.0;

    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t as f32
    }
    fn to_rgba(self) -> Rgba<u8> {
        let v = (self.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([v, v, v, 255])
    }
}

impl Pixel for Rgba<u8> {
    const SENTINEL: Self = Rgba([0, 0, 0, 0]);

    fn lerp(self, other: Self, t: f64) -> Self {
        let Rgba(a) = self;
        let Rgba(b) = other;
        Rgba([0, 1, 2, 3].map(|i| a[i].lerp(b[i], t)))
    }
    fn to_rgba(self) -> Rgba<u8> {
        self
    }
}
