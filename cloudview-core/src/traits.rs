//! Core traits for cloudview

use crate::{point::*, point_cloud::*};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

impl Drawable for IntensityPointCloud {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let bounds = self.bounds();
        (bounds.lower, bounds.upper)
    }

    fn center(&self) -> Point3f {
        IntensityPointCloud::center(self)
    }
}

impl Drawable for [Point3f] {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let Some(first) = self.first() else {
            return (Point3f::origin(), Point3f::origin());
        };

        let mut bounds = Bounds3::from_point(first);
        for point in self {
            bounds.include(point);
        }
        (bounds.lower, bounds.upper)
    }
}
