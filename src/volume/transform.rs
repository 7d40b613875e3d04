use crate::model::Plane;
use anyhow::*;
use nalgebra::{Point3, Quaternion, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Placement of a volume in the world: `world = rotation * (scale ∘ local) + position`.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeTransform {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}
impl Default for VolumeTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}
impl VolumeTransform {
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>, scale: Vector3<f64>) -> Result<Self, Error> {
        if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            bail!("Scale must be finite and non-zero but was {:?}", scale.as_slice());
        }
        if position.iter().any(|p| !p.is_finite()) {
            bail!("Position must be finite but was {:?}", position.as_slice());
        }
        Ok(Self {
            position,
            rotation,
            scale,
        })
    }

    pub fn from_json_file(path: &std::path::Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).context("Failed to read transform file")?;
        Self::from_json(&json).with_context(|| format!("Invalid transform file {}", path.display()))
    }
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let tf: TransformFile = serde_json::from_str(json)?;
        let rotation = match (tf.rotation, tf.euler_degrees) {
            (Some(_), Some(_)) => bail!("Only one of `rotation` and `euler_degrees` may be given"),
            (Some([x, y, z, w]), None) => {
                let q = Quaternion::new(w, x, y, z);
                if !(q.norm() > f64::EPSILON) {
                    bail!("Rotation quaternion must not be zero");
                }
                UnitQuaternion::from_quaternion(q)
            }
            (None, Some([x, y, z])) => {
                UnitQuaternion::from_euler_angles(x.to_radians(), y.to_radians(), z.to_radians())
            }
            (None, None) => UnitQuaternion::identity(),
        };
        Self::new(tf.position.into(), rotation, tf.scale.into())
    }
    /// Convenience function to parse either inline JSON or a path to a JSON file, depending on whether the input starts with "{" or not
    pub fn from_json_or_path(json_or_path: &str) -> Result<Self, Error> {
        let json_or_path = json_or_path.trim();
        if json_or_path.starts_with('{') {
            Self::from_json(json_or_path)
        } else {
            Self::from_json_file(std::path::Path::new(json_or_path))
        }
    }

    pub fn local_to_world_point(&self, local: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * local.coords.component_mul(&self.scale) + self.position)
    }
    pub fn world_to_local_point(&self, world: &Point3<f64>) -> Point3<f64> {
        let unrotated = self.rotation.inverse_transform_vector(&(world.coords - self.position));
        Point3::from(unrotated.component_div(&self.scale))
    }
    /// Normals map with the inverse transpose, which for rotation and scale is `scale ∘ rotation⁻¹`.
    pub fn world_to_local_normal(&self, world: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
        let local = self.rotation.inverse_transform_vector(world).component_mul(&self.scale);
        Unit::try_new(local, f64::EPSILON)
    }
    pub fn world_to_local_plane(&self, world: &Plane) -> Option<Plane> {
        Some(Plane::from_unit(
            self.world_to_local_point(&world.position),
            self.world_to_local_normal(&world.normal)?,
        ))
    }
}

/// JSON layout of a volume pose:
///
/// ```json
/// { "position": [0, 1, 0], "euler_degrees": [0, 90, 0], "scale": [0.01, 0.01, 0.02] }
/// ```
/// `rotation` may be given as quaternion `[x, y, z, w]` instead of `euler_degrees`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TransformFile {
    #[serde(default)]
    position: [f64; 3],
    #[serde(default)]
    rotation: Option<[f64; 4]>,
    #[serde(default)]
    euler_degrees: Option<[f64; 3]>,
    #[serde(default = "unit_scale")]
    scale: [f64; 3],
}
fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn posed() -> VolumeTransform {
        VolumeTransform::from_json(r#"{ "position": [1, 2, 3], "euler_degrees": [0, 0, 90], "scale": [2, 1, 4] }"#)
            .unwrap()
    }

    #[test]
    fn test_point_round_trip() {
        let tf = posed();
        let local = Point3::new(0.5, -1.0, 2.0);
        let world = tf.local_to_world_point(&local);
        // scale (1, -1, 8), rotate 90° about z to (1, 1, 8), translate
        assert_relative_eq!(world, Point3::new(2.0, 3.0, 11.0), epsilon = 1e-12);
        assert_relative_eq!(tf.world_to_local_point(&world), local, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_maps_into_local_frame() {
        let tf = posed();
        let local_plane = Plane::new(Point3::new(0.5, 0.25, -1.0), Vector3::new(1.0, 2.0, 0.5)).unwrap();

        // two directions inside the local plane stay inside the world plane and vice versa
        let t1 = Vector3::new(2.0, -1.0, 0.0);
        let t2 = Vector3::new(0.0, -0.25, 1.0);
        let world_points = [t1, t2].map(|t| tf.local_to_world_point(&(local_plane.position + t)));
        let world_origin = tf.local_to_world_point(&local_plane.position);
        let world_normal = (world_points[0] - world_origin).cross(&(world_points[1] - world_origin));
        let world_plane = Plane::new(world_origin, world_normal).unwrap();

        let mapped = tf.world_to_local_plane(&world_plane).unwrap();
        assert_relative_eq!(mapped.position, local_plane.position, epsilon = 1e-12);
        let dot = mapped.normal.dot(&local_plane.normal.into_inner());
        assert_relative_eq!(dot.abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_variants() {
        let tf = VolumeTransform::from_json("{}").unwrap();
        assert_eq!(tf, VolumeTransform::default());

        let tf = VolumeTransform::from_json(r#"{ "rotation": [0, 0, 0, 2] }"#).unwrap();
        assert_relative_eq!(tf.rotation, UnitQuaternion::identity());

        assert!(VolumeTransform::from_json(r#"{ "rotation": [0, 0, 0, 1], "euler_degrees": [0, 0, 0] }"#).is_err());
        assert!(VolumeTransform::from_json(r#"{ "rotation": [0, 0, 0, 0] }"#).is_err());
        assert!(VolumeTransform::from_json(r#"{ "scale": [1, 0, 1] }"#).is_err());
        assert!(VolumeTransform::from_json(r#"{ "offset": [1, 0, 1] }"#).is_err());
    }

    #[test]
    fn test_json_or_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.json");
        std::fs::write(&path, r#"{ "position": [4, 5, 6] }"#).unwrap();

        let from_path = VolumeTransform::from_json_or_path(path.to_str().unwrap()).unwrap();
        assert_relative_eq!(from_path.position, Vector3::new(4.0, 5.0, 6.0));
        let inline = VolumeTransform::from_json_or_path(r#" { "position": [4, 5, 6] }"#).unwrap();
        assert_eq!(inline, from_path);
        assert!(VolumeTransform::from_json_or_path("/does/not/exist.json").is_err());
    }
}
