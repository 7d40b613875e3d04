use super::EPSILON;
use crate::model::Plane;
use crate::volume::{Corner, Pixel, VoxelGrid};
use nalgebra::{Point3, Vector3};

/// One of the twelve bounding box edges, expressed as a ray along a positive axis.
///
/// `max_distance` is the signed edge length: edges starting on the maximum side of their
/// axis run backwards and have a negative `max_distance`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxEdge {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
    pub max_distance: f64,
}
impl BoxEdge {
    /// The point where `plane` crosses this edge, if it does.
    pub fn intersect(&self, plane: &Plane) -> Option<Point3<f64>> {
        let d = plane.intersect_ray(&self.origin, &self.direction)?;
        let tolerance = EPSILON * self.max_distance.abs().max(1.0);
        let on_edge = if self.max_distance >= 0.0 {
            -tolerance <= d && d <= self.max_distance + tolerance
        } else {
            self.max_distance - tolerance <= d && d <= tolerance
        };
        on_edge.then(|| self.origin + self.direction * d)
    }
}

pub fn box_edges<P: Pixel>(volume: &VoxelGrid<P>) -> [BoxEdge; 12] {
    use Corner::*;

    let size = volume.size();
    let edge = |corner: Corner, axis: usize, forward: bool| {
        let mut direction = Vector3::zeros();
        direction[axis] = 1.0;
        BoxEdge {
            origin: volume.corner(corner),
            direction,
            max_distance: if forward { size[axis] } else { -size[axis] },
        }
    };

    [
        edge(BottomFrontLeft, 0, true),
        edge(BottomFrontLeft, 1, true),
        edge(BottomFrontLeft, 2, true),
        edge(TopBackRight, 0, false),
        edge(TopBackRight, 1, false),
        edge(TopBackRight, 2, false),
        edge(BottomFrontRight, 1, true),
        edge(BottomFrontRight, 2, true),
        edge(TopFrontLeft, 0, true),
        edge(TopFrontLeft, 2, true),
        edge(BottomBackLeft, 0, true),
        edge(BottomBackLeft, 1, true),
    ]
}

/// All points where `plane` crosses the volume's bounding edges.
///
/// Hits that coincide (the plane passing through a box corner crosses every edge meeting
/// there) are reported once. Returns `None` for fewer than three distinct points, i.e. when
/// the plane misses the volume or only touches a corner or an edge.
pub fn intersect_edges<P: Pixel>(volume: &VoxelGrid<P>, plane: &Plane) -> Option<Vec<Point3<f64>>> {
    let merge_distance = EPSILON * volume.size().norm().max(1.0);

    let mut points: Vec<Point3<f64>> = Vec::with_capacity(6);
    for edge in box_edges(volume) {
        if let Some(hit) = edge.intersect(plane) {
            if points.iter().all(|p| (p - hit).norm() > merge_distance) {
                points.push(hit);
            }
        }
    }

    if points.len() < 3 {
        log::trace!("degenerate intersection, {} edge hits", points.len());
        return None;
    }
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube() -> VoxelGrid<u8> {
        VoxelGrid::with_unit_voxels([10, 10, 10], vec![0; 1000]).unwrap()
    }

    fn plane(position: [f64; 3], normal: [f64; 3]) -> Plane {
        Plane::new(position.into(), normal.into()).unwrap()
    }

    #[test]
    fn test_edges_cover_the_box() {
        let grid = VoxelGrid::with_unit_voxels([2, 4, 6], vec![0u8; 48]).unwrap();
        let edges = box_edges(&grid);

        let mut per_axis = [0; 3];
        let mut endpoints = vec![];
        for edge in edges.iter() {
            let axis = edge.direction.iamax();
            per_axis[axis] += 1;
            assert_relative_eq!(edge.max_distance.abs(), grid.size()[axis]);
            endpoints.push((edge.origin, edge.origin + edge.direction * edge.max_distance));
        }
        assert_eq!(per_axis, [4, 4, 4]);

        // no edge is listed twice
        for (i, (a0, a1)) in endpoints.iter().enumerate() {
            for (b0, b1) in endpoints.iter().skip(i + 1) {
                let same = ((a0 - b0).norm() < 1e-9 && (a1 - b1).norm() < 1e-9)
                    || ((a0 - b1).norm() < 1e-9 && (a1 - b0).norm() < 1e-9);
                assert!(!same);
            }
        }
    }

    #[test]
    fn test_backward_edges_accept_negative_distances() {
        let grid = cube();
        let backward = box_edges(&grid)[5];
        assert_eq!(backward.origin, grid.corner(Corner::TopBackRight));
        let hit = backward.intersect(&plane([0.0, 0.0, 1.0], [0.0, 0.0, 1.0])).unwrap();
        assert_relative_eq!(hit, Point3::new(5.0, 5.0, 1.0));
        assert!(backward.intersect(&plane([0.0, 0.0, 6.0], [0.0, 0.0, 1.0])).is_none());
    }

    #[test]
    fn test_axis_aligned_plane_hits_four_edges() {
        let points = intersect_edges(&cube(), &plane([0.0, 0.0, 0.0], [0.0, 0.0, 1.0])).unwrap();
        assert_eq!(points.len(), 4);
        for p in points {
            assert_relative_eq!(p.z, 0.0);
            assert_relative_eq!(p.x.abs(), 5.0);
            assert_relative_eq!(p.y.abs(), 5.0);
        }
    }

    #[test]
    fn test_oblique_plane_hits_six_edges() {
        let points = intersect_edges(&cube(), &plane([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])).unwrap();
        assert_eq!(points.len(), 6);
    }

    #[test]
    fn test_corner_cut_hits_three_edges() {
        let points = intersect_edges(&cube(), &plane([4.0, 4.0, 4.0], [1.0, 1.0, 1.0])).unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_misses_and_grazes() {
        let grid = cube();
        assert!(intersect_edges(&grid, &plane([0.0, 0.0, 20.0], [0.0, 0.0, 1.0])).is_none());
        assert!(intersect_edges(&grid, &plane([0.0, 0.0, -8.0], [0.2, 0.1, 1.0])).is_none());
        // touching only the top back right corner
        assert!(intersect_edges(&grid, &plane([5.0, 5.0, 5.0], [1.0, 1.0, 1.0])).is_none());
        // touching only one edge
        assert!(intersect_edges(&grid, &plane([5.0, 5.0, 0.0], [1.0, 1.0, 0.0])).is_none());
    }
}
