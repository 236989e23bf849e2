//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of matrix helpers the scene
//! core needs. All matrices are column-vector convention: `parent * local`.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid transform plus scale, expanded to a matrix in TRS order
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation from an axis and an angle in radians
    ///
    /// A zero-length axis leaves the rotation at identity.
    #[must_use]
    pub fn with_axis_angle(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation = Unit::try_new(axis, f32::EPSILON)
            .map_or_else(Quat::identity, |axis| Quat::from_axis_angle(&axis, angle));
        self
    }

    /// Set the scale factors
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Transform a point as the homogeneous vector `(x, y, z, 1)`, keeping xyz
    fn transform_position(&self, point: &Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn transform_position(&self, point: &Vec3) -> Vec3 {
        // No perspective divide: scene matrices are affine.
        (self * point.push(1.0)).xyz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trs_order() {
        let transform = Transform::from_position(Vec3::new(5.0, 0.0, 0.0))
            .with_axis_angle(Vec3::y(), std::f32::consts::FRAC_PI_2)
            .with_scale(Vec3::new(2.0, 2.0, 2.0));

        // Scale first, then rotate +X onto -Z, then translate.
        let moved = transform.to_matrix().transform_position(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(5.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_axis_is_identity_rotation() {
        let transform = Transform::identity().with_axis_angle(Vec3::zeros(), 1.0);
        assert_eq!(transform.rotation, Quat::identity());
    }

    #[test]
    fn test_transform_position_uses_translation() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(matrix.transform_position(&Vec3::zeros()), Vec3::new(1.0, 2.0, 3.0));
    }
}
