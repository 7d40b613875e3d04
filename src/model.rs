use nalgebra::{Point3, Unit, Vector3};

/// A cutting plane, given by a point on it and its unit normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub position: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}
impl Plane {
    /// Returns `None` if `normal` has no usable direction.
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        if !normal.iter().all(|c| c.is_finite()) {
            return None;
        }
        let normal = Unit::try_new(normal, f64::EPSILON)?;
        Some(Self { position, normal })
    }
    pub fn from_unit(position: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self { position, normal }
    }

    pub fn flipped(&self) -> Self {
        Self {
            position: self.position,
            normal: -self.normal,
        }
    }

    /// Signed distance of `point` along the normal, positive on the side the normal points to.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.position))
    }

    /// Distance `d` along `direction` at which the ray `origin + d * direction` meets the plane.
    ///
    /// `None` if ray and plane are parallel. `d` may be negative.
    pub fn intersect_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<f64> {
        let denom = self.normal.dot(direction);
        if denom.abs() < 1e-12 {
            return None;
        }
        Some(self.normal.dot(&(self.position - origin)) / denom)
    }
}
