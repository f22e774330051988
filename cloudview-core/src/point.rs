//! Point types and related functionality

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A pointer position in window pixels
pub type PixelPos = Point2<i32>;

/// A point carrying a scalar intensity, one row of a scan file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityPoint3f {
    pub position: Point3f,
    pub intensity: f32,
}

impl IntensityPoint3f {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            intensity,
        }
    }
}

impl Default for IntensityPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            intensity: 0.0,
        }
    }
}

impl From<IntensityPoint3f> for Point3f {
    fn from(point: IntensityPoint3f) -> Self {
        point.position
    }
}
