//! Intensity point cloud with running axis-aligned bounds

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Axis-aligned lower/upper corners of a point set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub lower: Point3f,
    pub upper: Point3f,
}

impl Bounds3 {
    /// Degenerate bounds at the origin, used for an empty cloud
    pub fn origin() -> Self {
        Self {
            lower: Point3f::origin(),
            upper: Point3f::origin(),
        }
    }

    /// Bounds enclosing exactly one point
    pub fn from_point(point: &Point3f) -> Self {
        Self {
            lower: *point,
            upper: *point,
        }
    }

    /// Grow the bounds to include `point`
    pub fn include(&mut self, point: &Point3f) {
        self.lower.x = self.lower.x.min(point.x);
        self.lower.y = self.lower.y.min(point.y);
        self.lower.z = self.lower.z.min(point.z);

        self.upper.x = self.upper.x.max(point.x);
        self.upper.y = self.upper.y.max(point.y);
        self.upper.z = self.upper.z.max(point.z);
    }

    /// Midpoint of the two corners
    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.lower, &self.upper)
    }

    /// Width, height and depth
    pub fn extent(&self) -> Vector3f {
        self.upper - self.lower
    }
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::origin()
    }
}

/// Points and their intensities, stored side by side in file order.
///
/// Bounds are tracked as points are pushed, so `bounds()` and `center()`
/// are O(1). An empty cloud reports bounds and center at the origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntensityPointCloud {
    pub points: Vec<Point3f>,
    pub intensities: Vec<f32>,
    bounds: Option<Bounds3>,
}

impl IntensityPointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            intensities: Vec::with_capacity(capacity),
            bounds: None,
        }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point and its intensity, growing the bounds
    pub fn push(&mut self, point: IntensityPoint3f) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(&point.position),
            None => self.bounds = Some(Bounds3::from_point(&point.position)),
        }
        self.points.push(point.position);
        self.intensities.push(point.intensity);
    }

    /// Lower/upper bounds, or origin bounds when empty
    pub fn bounds(&self) -> Bounds3 {
        self.bounds.unwrap_or_default()
    }

    pub fn lower_bound(&self) -> Point3f {
        self.bounds().lower
    }

    pub fn upper_bound(&self) -> Point3f {
        self.bounds().upper
    }

    /// Center of the bounding box
    pub fn center(&self) -> Point3f {
        self.bounds().center()
    }

    /// Get an iterator over the points with their intensities
    pub fn iter(&self) -> impl Iterator<Item = IntensityPoint3f> + '_ {
        self.points
            .iter()
            .zip(self.intensities.iter())
            .map(|(position, intensity)| IntensityPoint3f {
                position: *position,
                intensity: *intensity,
            })
    }
}

impl Index<usize> for IntensityPointCloud {
    type Output = Point3f;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl Extend<IntensityPoint3f> for IntensityPointCloud {
    fn extend<I: IntoIterator<Item = IntensityPoint3f>>(&mut self, iter: I) {
        for point in iter {
            self.push(point);
        }
    }
}

impl FromIterator<IntensityPoint3f> for IntensityPointCloud {
    fn from_iter<I: IntoIterator<Item = IntensityPoint3f>>(iter: I) -> Self {
        let mut cloud = Self::new();
        cloud.extend(iter);
        cloud
    }
}
