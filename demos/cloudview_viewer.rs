//! Cloudview Viewer
//!
//! Opens the 2D image viewer and, when the scan loads, the 3D point cloud
//! viewer side by side.
//!
//! Controls:
//! - Image window: left drag pans, wheel zooms at the cursor, right click
//!   marks a point on the image
//! - Cloud window: left drag orbits, right drag pans, wheel zooms
//! - R: reset the camera
//! - Q / Escape: quit

use anyhow::{Context, Result};
use clap::Parser;
use cloudview_io::load_intensity_cloud;
use cloudview_visualization::{CloudViewerSession, ImageViewerSession, ViewerApp, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cloudview_viewer", about = "Interactive image and point cloud viewer")]
struct Args {
    /// Point cloud file with one `x y z intensity` record per line
    #[arg(long, default_value = "points.txt")]
    cloud: PathBuf,

    /// Image for the 2D viewer; a test card is shown when omitted
    #[arg(long)]
    image: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let image_session = match &args.image {
        Some(path) => {
            let source = image::open(path)
                .with_context(|| format!("failed to open image {}", path.display()))?
                .to_rgba8();
            ImageViewerSession::new(source, config.viewport.clone())
        }
        None => ImageViewerSession::with_test_card(config.viewport.clone()),
    };

    let mut app = ViewerApp::new().with_image(image_session);

    match load_intensity_cloud(&args.cloud) {
        Ok(cloud) => {
            log::info!(
                "cloud center ({:.3}, {:.3}, {:.3})",
                cloud.center().x,
                cloud.center().y,
                cloud.center().z
            );
            app = app.with_cloud(CloudViewerSession::new(
                cloud,
                config.camera.clone(),
                config.window.clone(),
            ));
        }
        Err(e) => log::warn!("{}; running without the point cloud viewer", e),
    }

    app.run()?;
    Ok(())
}
