//! 2D and 3D transformation utilities

use nalgebra::{Matrix2x3, Matrix4, Point2, Point3, Unit, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D transformation that can be applied to points and point clouds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a rotation transformation from a quaternion
    pub fn rotation(rotation: UnitQuaternion<f32>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Rotation of `angle_deg` degrees about `axis`, counter-clockwise when
    /// looking down the axis towards the origin.
    pub fn rotation_deg(angle_deg: f32, axis: Vector3<f32>) -> Self {
        let axis = Unit::new_normalize(axis);
        Self::rotation(UnitQuaternion::from_axis_angle(&axis, angle_deg.to_radians()))
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another. `other` is applied to
    /// geometry first, the way successive fixed-function calls stack.
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f32>> for Transform3D {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }
}

/// A 2x3 affine matrix `[[a, b, tx], [c, d, ty]]` mapping source pixels
/// to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine2D {
    pub matrix: Matrix2x3<f32>,
}

impl Affine2D {
    /// Identity linear part with translation `(tx, ty)`
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            matrix: Matrix2x3::new(
                1.0, 0.0, tx,
                0.0, 1.0, ty,
            ),
        }
    }

    /// Translation column
    pub fn offset(&self) -> Vector2<f32> {
        Vector2::new(self.matrix[(0, 2)], self.matrix[(1, 2)])
    }

    /// Map a source pixel to canvas coordinates
    pub fn apply(&self, point: &Point2<f32>) -> Point2<f32> {
        let m = &self.matrix;
        Point2::new(
            m[(0, 0)] * point.x + m[(0, 1)] * point.y + m[(0, 2)],
            m[(1, 0)] * point.x + m[(1, 1)] * point.y + m[(1, 2)],
        )
    }

    /// True when the linear part is the identity, i.e. the map is a pure
    /// integer-friendly translation.
    pub fn is_translation(&self) -> bool {
        let m = &self.matrix;
        m[(0, 0)] == 1.0 && m[(0, 1)] == 0.0 && m[(1, 0)] == 0.0 && m[(1, 1)] == 1.0
    }
}
