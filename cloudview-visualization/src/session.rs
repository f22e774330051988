//! Viewer sessions: one controller plus the data it shows
//!
//! A session owns its controller and reacts to input through
//! [`InputHandler`]. After every update it can build the frame description
//! for a renderer and rasterize it.

use crate::camera::{Frustum, OrbitCamera, PointDraw, ViewTransform};
use crate::config::{OrbitConfig, ViewportConfig, WindowConfig};
use crate::input::{ButtonMask, InputHandler, Key, KeyOutcome, PointerButton, WheelDirection};
use crate::raster;
use crate::viewport::ViewportController;
use cloudview_core::{Affine2D, IntensityPointCloud, PixelPos};
use image::RgbaImage;

/// Everything needed to draw one 2D frame
#[derive(Debug, Clone)]
pub struct ImageFrame {
    /// Visible part of the source, resampled at the current scale
    pub scaled: RgbaImage,
    /// Places `scaled` on the canvas
    pub placement: Affine2D,
    /// Viewport transform for the whole source
    pub transform: Affine2D,
    pub canvas: (u32, u32),
    pub overlay: String,
}

/// 2D pan/zoom image viewer
pub struct ImageViewerSession {
    config: ViewportConfig,
    source: RgbaImage,
    viewport: ViewportController,
}

impl ImageViewerSession {
    pub fn new(source: RgbaImage, config: ViewportConfig) -> Self {
        let viewport = ViewportController::new(&config);
        Self {
            config,
            source,
            viewport,
        }
    }

    /// Session showing the generated test card
    pub fn with_test_card(config: ViewportConfig) -> Self {
        let card = raster::test_card(config.width, config.height, config.background);
        Self::new(card, config)
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// Stamp a marker on the source image under canvas pixel `pos`
    pub fn mark_point(&mut self, pos: PixelPos) -> bool {
        if !self.viewport.contains(pos) {
            return false;
        }
        let target = self.viewport.screen_to_source(pos);
        let (w, h) = self.source.dimensions();
        if target.x < 0.0 || target.y < 0.0 || target.x >= w as f32 || target.y >= h as f32 {
            return false;
        }

        log::debug!("marking source pixel ({:.1}, {:.1})", target.x, target.y);
        raster::draw_marker(
            &mut self.source,
            target,
            self.config.marker_radius,
            raster::rgba(self.config.marker_color),
        );
        true
    }

    pub fn frame(&self) -> ImageFrame {
        let transform = self.viewport.build_transform();
        let (scaled, placement) = match self.viewport.visible_region(self.source.dimensions()) {
            Some(region) => (
                raster::resample_region(&self.source, region.source, region.scaled_size),
                Affine2D::translation(region.offset.x, region.offset.y),
            ),
            None => (RgbaImage::new(0, 0), transform),
        };

        ImageFrame {
            scaled,
            placement,
            transform,
            canvas: self.viewport.canvas_size(),
            overlay: self.viewport.overlay_text(),
        }
    }

    pub fn render(&self) -> RgbaImage {
        let frame = self.frame();
        raster::warp_affine(
            &frame.scaled,
            &frame.placement,
            frame.canvas,
            raster::rgba(self.config.background),
        )
    }
}

impl InputHandler for ImageViewerSession {
    fn on_pointer_down(&mut self, button: PointerButton, pos: PixelPos) -> bool {
        match button {
            PointerButton::Primary => {
                self.viewport.on_drag_start(pos);
                false
            }
            PointerButton::Secondary => self.mark_point(pos),
        }
    }

    fn on_pointer_move(&mut self, pos: PixelPos, held: ButtonMask) -> bool {
        if held.contains(PointerButton::Primary) {
            self.viewport.on_drag(pos)
        } else {
            false
        }
    }

    fn on_wheel(&mut self, delta: f32, pos: PixelPos) -> bool {
        match WheelDirection::from_delta(delta) {
            Some(direction) => self.viewport.on_zoom(direction, pos),
            None => false,
        }
    }
}

/// Everything needed to draw one 3D frame
#[derive(Debug, Clone)]
pub struct CloudFrame {
    pub frustum: Frustum,
    pub view: ViewTransform,
    pub draws: Vec<PointDraw>,
}

/// 3D orbit viewer for one point cloud
pub struct CloudViewerSession {
    window: WindowConfig,
    size: (u32, u32),
    cloud: IntensityPointCloud,
    camera: OrbitCamera,
}

impl CloudViewerSession {
    /// The camera starts centred on the cloud's bounding box
    pub fn new(cloud: IntensityPointCloud, camera: OrbitConfig, window: WindowConfig) -> Self {
        let camera = OrbitCamera::for_cloud(camera, &cloud);
        Self {
            size: (window.width, window.height),
            window,
            cloud,
            camera,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn cloud(&self) -> &IntensityPointCloud {
        &self.cloud
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }

    fn contains(&self, pos: PixelPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.size.0 && (pos.y as u32) < self.size.1
    }

    /// Title line describing the camera
    pub fn overlay_text(&self) -> String {
        let s = self.camera.state();
        format!(
            "{} points | yaw {:.0} pitch {:.0} distance {:.0}",
            self.cloud.len(),
            s.yaw,
            s.pitch,
            s.distance
        )
    }

    pub fn frame(&self) -> CloudFrame {
        let (frustum, view) = self.camera.build_view_and_projection(self.aspect_ratio());
        CloudFrame {
            frustum,
            view,
            draws: OrbitCamera::point_draws(&self.cloud, self.window.point_color),
        }
    }

    pub fn render(&self) -> RgbaImage {
        let frame = self.frame();
        raster::render_points(
            &frame.draws,
            &frame.frustum,
            &frame.view,
            self.size,
            raster::rgba(self.window.background),
        )
    }
}

impl InputHandler for CloudViewerSession {
    fn on_pointer_down(&mut self, _button: PointerButton, pos: PixelPos) -> bool {
        if self.contains(pos) {
            self.camera.on_pointer_down(pos);
        }
        false
    }

    fn on_pointer_move(&mut self, pos: PixelPos, held: ButtonMask) -> bool {
        if !self.contains(pos) {
            return false;
        }
        if held.contains(PointerButton::Primary) {
            self.camera.on_orbit_drag(pos)
        } else if held.contains(PointerButton::Secondary) {
            self.camera.on_pan_drag(pos)
        } else {
            false
        }
    }

    fn on_wheel(&mut self, delta: f32, pos: PixelPos) -> bool {
        if !self.contains(pos) {
            return false;
        }
        match WheelDirection::from_delta(delta) {
            Some(direction) => self.camera.on_zoom(direction),
            None => false,
        }
    }

    fn on_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Quit => KeyOutcome::Quit,
            Key::Reset => {
                self.camera.reset();
                KeyOutcome::Redraw
            }
            Key::Other => KeyOutcome::Continue,
        }
    }
}
