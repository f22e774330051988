//! Core data structures and transforms for cloudview
//!
//! This crate provides the fundamental types shared by the viewer crates:
//! points, intensity point clouds with their bounds, and the 2D/3D
//! transforms handed to a renderer.

pub mod point;
pub mod point_cloud;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector2, Vector3, Matrix4, Matrix2x3};
