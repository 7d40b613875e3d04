use crate::model::Plane;
use crate::volume::VolumeTransform;
use itertools::{Itertools, MinMaxResult};
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// The bounding rectangle of a cross-section, lying in the cutting plane.
///
/// "Left" and "up" are as seen by a viewer looking along the (down-facing) plane normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quadrilateral {
    pub upper_left: Point3<f64>,
    pub lower_left: Point3<f64>,
    pub lower_right: Point3<f64>,
    pub upper_right: Point3<f64>,
}
impl Quadrilateral {
    /// Corners in `[upper_left, lower_left, lower_right, upper_right]` order.
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [self.upper_left, self.lower_left, self.lower_right, self.upper_right]
    }
    /// From the lower left to the upper left corner.
    pub fn height_vector(&self) -> Vector3<f64> {
        self.upper_left - self.lower_left
    }
    /// From the lower left to the lower right corner.
    pub fn width_vector(&self) -> Vector3<f64> {
        self.lower_right - self.lower_left
    }
    pub fn to_world(&self, transform: &VolumeTransform) -> Quadrilateral {
        Quadrilateral {
            upper_left: transform.local_to_world_point(&self.upper_left),
            lower_left: transform.local_to_world_point(&self.lower_left),
            lower_right: transform.local_to_world_point(&self.lower_right),
            upper_right: transform.local_to_world_point(&self.upper_right),
        }
    }
}

/// Signed distance of `point` from the plane through `anchor` with normal `axis`.
pub fn signed_distance_along_axis(point: &Point3<f64>, anchor: &Point3<f64>, axis: &Unit<Vector3<f64>>) -> f64 {
    Plane::from_unit(*anchor, *axis).signed_distance(point)
}

struct SliceAxes {
    left: Unit<Vector3<f64>>,
    right: Unit<Vector3<f64>>,
    up: Unit<Vector3<f64>>,
}

/// In-plane axes of a viewer looking along `normal`.
///
/// The normal is flipped to never face upward (+y). A horizontal plane has no defined
/// vertical direction, there +z is used as reference up instead of +y.
fn slice_axes(normal: &Unit<Vector3<f64>>) -> SliceAxes {
    let forward = if normal.y > 0.0 { -*normal } else { *normal };
    let reference_up = if forward.cross(&Vector3::y()).norm() < 1e-6 {
        Vector3::z()
    } else {
        Vector3::y()
    };

    let rotation = Rotation3::face_towards(&forward.into_inner(), &reference_up);
    let right = Unit::new_normalize(rotation * Vector3::x());
    let up = Unit::new_normalize(rotation * Vector3::y());
    SliceAxes {
        left: -right,
        right,
        up,
    }
}

/// The points with the largest and the smallest extent along `axis`.
fn extremes(
    points: &[Point3<f64>],
    anchor: &Point3<f64>,
    axis: &Unit<Vector3<f64>>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let distance = |p: &Point3<f64>| signed_distance_along_axis(p, anchor, axis);
    match points.iter().minmax_by(|a, b| distance(*a).total_cmp(&distance(*b))) {
        MinMaxResult::MinMax(min, max) => Some((*max, *min)),
        MinMaxResult::OneElement(p) => Some((*p, *p)),
        MinMaxResult::NoElements => None,
    }
}

/// Moves `point` along `axis` until it meets the plane through `anchor` perpendicular to `axis`.
fn project_along(point: &Point3<f64>, anchor: &Point3<f64>, axis: &Unit<Vector3<f64>>) -> Option<Point3<f64>> {
    let d = Plane::from_unit(*anchor, *axis).intersect_ray(point, axis)?;
    Some(point + axis.into_inner() * d)
}

/// Returns the pair as `(left, right)`, whichever lies farther along `left` comes first.
fn order_along(left: &Unit<Vector3<f64>>, a: Point3<f64>, b: Point3<f64>) -> (Point3<f64>, Point3<f64>) {
    if signed_distance_along_axis(&b, &a, left) > 0.0 {
        (b, a)
    } else {
        (a, b)
    }
}

/// Reduces the edge hits of a cross-section to the rectangle bounding them.
///
/// The rectangle spans from the leftmost to the rightmost hit and from the lowest to the
/// highest one, seen by a viewer looking along `normal`.
pub fn reduce(points: &[Point3<f64>], normal: &Unit<Vector3<f64>>) -> Option<Quadrilateral> {
    if points.len() < 3 {
        return None;
    }
    let axes = slice_axes(normal);
    let anchor = points[0];

    let (left_point, right_point) = extremes(points, &anchor, &axes.left)?;
    let (top_point, bottom_point) = extremes(points, &anchor, &axes.up)?;

    let upper_left = project_along(&top_point, &left_point, &axes.left)?;
    let lower_left = project_along(&bottom_point, &left_point, &axes.left)?;
    let lower_right = project_along(&bottom_point, &right_point, &axes.right)?;
    let upper_right = project_along(&top_point, &right_point, &axes.right)?;

    let (upper_left, upper_right) = order_along(&axes.left, upper_left, upper_right);
    let (lower_left, lower_right) = order_along(&axes.left, lower_left, lower_right);

    Some(Quadrilateral {
        upper_left,
        lower_left,
        lower_right,
        upper_right,
    })
}
