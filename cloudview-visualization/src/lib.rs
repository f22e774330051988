//! Interactive viewers for images and point clouds
//!
//! This crate provides the interactive side of cloudview:
//! - 2D pan/zoom viewport controller
//! - Orbit camera controller for point clouds
//! - CPU rasterization of both views
//! - winit + wgpu window back end

pub mod app;
pub mod camera;
pub mod config;
pub mod input;
pub mod presenter;
pub mod raster;
pub mod session;
pub mod shaders;
pub mod viewport;

pub use app::*;
pub use camera::*;
pub use config::*;
pub use input::*;
pub use session::*;
pub use viewport::*;

use cloudview_core::{IntensityPointCloud, Result};

/// Show a point cloud in an orbit viewer window until it is closed
pub fn show_point_cloud(cloud: IntensityPointCloud, config: &ViewerConfig) -> Result<()> {
    let session = CloudViewerSession::new(cloud, config.camera.clone(), config.window.clone());
    ViewerApp::new().with_cloud(session).run()
}
