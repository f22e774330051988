//! Orbit camera for viewing a point cloud
//!
//! The camera is described by yaw/pitch angles in degrees, a screen-space
//! pan and a dolly distance. Each frame it produces a symmetric perspective
//! frustum and an ordered list of view operations, issued the way
//! fixed-function OpenGL stacks `glTranslate`/`glRotate` calls.

use crate::config::OrbitConfig;
use crate::input::WheelDirection;
use cloudview_core::{Drawable, IntensityPointCloud, PixelPos, Point3f, Transform3D};
use nalgebra::{Matrix4, Vector3};

/// Wrap an angle in degrees into `[0, 360)`
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Camera parameters driven by pointer and wheel input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraState {
    /// Degrees in `[0, 360)`
    pub yaw: f32,
    /// Degrees in `[0, 360)`
    pub pitch: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    /// Clamped to the configured distance range after every update
    pub distance: f32,
}

/// Symmetric perspective frustum, in the six-plane form of `glFrustum`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Frustum for a vertical field of view in degrees
    pub fn from_perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let top = near * (fov_y_deg.to_radians() / 2.0).tan();
        let bottom = -top;
        Self {
            left: bottom * aspect,
            right: top * aspect,
            bottom,
            top,
            near,
            far,
        }
    }

    /// Projection matrix mapping eye space to clip space
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let (l, r, b, t, n, f) = (self.left, self.right, self.bottom, self.top, self.near, self.far);
        Matrix4::new(
            2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0,
            0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0,
            0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0, 0.0, -1.0, 0.0,
        )
    }
}

/// One step of the view transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOp {
    Translate(Vector3<f32>),
    Rotate { angle_deg: f32, axis: Vector3<f32> },
}

impl ViewOp {
    pub fn to_transform(&self) -> Transform3D {
        match *self {
            ViewOp::Translate(offset) => Transform3D::translation(offset),
            ViewOp::Rotate { angle_deg, axis } => Transform3D::rotation_deg(angle_deg, axis),
        }
    }
}

/// Ordered view operations, each right-multiplied onto the identity
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    pub ops: Vec<ViewOp>,
}

impl ViewTransform {
    /// The composed model-view matrix `op[0] * op[1] * ... * op[n-1]`
    pub fn matrix(&self) -> Matrix4<f32> {
        self.ops
            .iter()
            .fold(Transform3D::identity(), |acc, op| acc * op.to_transform())
            .matrix
    }
}

/// A single point to draw: position, size in pixels and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDraw {
    pub position: Point3f,
    /// `intensity / 100`, unclamped; may be zero, negative or large
    pub size: f32,
    pub color: [u8; 3],
}

/// Orbit camera controller.
///
/// Pointer drags are incremental: every move is measured against the
/// previous sample, so a drag integrates its deltas.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    state: OrbitCameraState,
    config: OrbitConfig,
    center: Point3f,
    last_pointer: Option<PixelPos>,
}

impl OrbitCamera {
    pub fn new(config: OrbitConfig) -> Self {
        let state = OrbitCameraState {
            yaw: 0.0,
            pitch: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            distance: config.default_distance.clamp(config.min_distance, config.max_distance),
        };
        Self {
            state,
            config,
            center: Point3f::origin(),
            last_pointer: None,
        }
    }

    /// Camera looking at the bounding-box center of `cloud`
    pub fn for_cloud<D: Drawable + ?Sized>(config: OrbitConfig, cloud: &D) -> Self {
        let mut camera = Self::new(config);
        camera.set_center(cloud.center());
        camera
    }

    pub fn state(&self) -> OrbitCameraState {
        self.state
    }

    pub fn center(&self) -> Point3f {
        self.center
    }

    /// Point the orbit moves around; moved to the origin by the view transform
    pub fn set_center(&mut self, center: Point3f) {
        self.center = center;
    }

    /// Start a drag sample at `pos`
    pub fn on_pointer_down(&mut self, pos: PixelPos) {
        self.last_pointer = Some(pos);
    }

    /// Delta from the previous sample, re-anchoring on `pos`
    fn take_delta(&mut self, pos: PixelPos) -> Option<(f32, f32)> {
        let last = self.last_pointer.replace(pos)?;
        let delta = pos - last;
        Some((delta.x as f32, delta.y as f32))
    }

    /// Primary-button drag sample
    pub fn on_orbit_drag(&mut self, pos: PixelPos) -> bool {
        match self.take_delta(pos) {
            Some((dx, dy)) if dx != 0.0 || dy != 0.0 => {
                self.orbit_by(dx, dy);
                true
            }
            _ => false,
        }
    }

    /// Secondary-button drag sample
    pub fn on_pan_drag(&mut self, pos: PixelPos) -> bool {
        match self.take_delta(pos) {
            Some((dx, dy)) if dx != 0.0 || dy != 0.0 => {
                self.pan_by(dx, dy);
                true
            }
            _ => false,
        }
    }

    /// Rotate by a pointer delta in pixels
    pub fn orbit_by(&mut self, dx: f32, dy: f32) {
        let k = self.config.orbit_sensitivity;
        self.state.yaw = wrap_degrees(self.state.yaw - dx * k);
        self.state.pitch = wrap_degrees(self.state.pitch - dy * k);
        log::debug!("orbit yaw {:.1} pitch {:.1}", self.state.yaw, self.state.pitch);
    }

    /// Pan by a pointer delta in pixels
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let k = self.config.pan_sensitivity;
        self.state.pan_x += dx * k;
        self.state.pan_y += dy * k;
        log::debug!("orbit pan ({:.1}, {:.1})", self.state.pan_x, self.state.pan_y);
    }

    /// One wheel notch: forward moves the camera away, backward moves it in
    pub fn on_zoom(&mut self, direction: WheelDirection) -> bool {
        let step = match direction {
            WheelDirection::Forward => self.config.zoom_step,
            WheelDirection::Backward => -self.config.zoom_step,
        };
        let before = self.state.distance;
        self.state.distance =
            (before + step).clamp(self.config.min_distance, self.config.max_distance);
        log::debug!("orbit distance {:.1}", self.state.distance);
        self.state.distance != before
    }

    /// Restore the default angles, pan and distance
    pub fn reset(&mut self) {
        let center = self.center;
        *self = Self::new(self.config.clone());
        self.center = center;
        log::debug!("orbit camera reset");
    }

    pub fn projection(&self, aspect: f32) -> Frustum {
        let c = &self.config;
        Frustum::from_perspective(c.fov_y_deg, aspect, c.near, c.far)
    }

    /// View operations in issue order: recenter, dolly/pan, pitch, yaw
    pub fn view(&self) -> ViewTransform {
        let s = &self.state;
        ViewTransform {
            ops: vec![
                ViewOp::Translate(-self.center.coords),
                ViewOp::Translate(Vector3::new(s.pan_x, -s.pan_y, -s.distance)),
                ViewOp::Rotate { angle_deg: -s.pitch, axis: Vector3::x() },
                ViewOp::Rotate { angle_deg: -s.yaw, axis: Vector3::y() },
            ],
        }
    }

    pub fn build_view_and_projection(&self, aspect: f32) -> (Frustum, ViewTransform) {
        (self.projection(aspect), self.view())
    }

    /// Draw calls for every point, sized by intensity
    pub fn point_draws(cloud: &IntensityPointCloud, color: [u8; 3]) -> Vec<PointDraw> {
        cloud
            .iter()
            .map(|p| PointDraw {
                position: p.position,
                size: p.intensity / 100.0,
                color,
            })
            .collect()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cloudview_core::IntensityPoint3f;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-10.0), 350.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert_eq!(wrap_degrees(-1e-9), 0.0);
    }

    #[test]
    fn test_orbit_drag_is_incremental() {
        let mut camera = OrbitCamera::default();
        camera.on_pointer_down(PixelPos::new(100, 100));

        // same delta each sample composes additively
        assert!(camera.on_orbit_drag(PixelPos::new(110, 100)));
        assert!(camera.on_orbit_drag(PixelPos::new(120, 100)));
        assert!(camera.on_orbit_drag(PixelPos::new(130, 105)));

        let state = camera.state();
        assert_relative_eq!(state.yaw, 330.0);
        assert_relative_eq!(state.pitch, 355.0);

        // repeating the last position adds nothing
        assert!(!camera.on_orbit_drag(PixelPos::new(130, 105)));
        assert_relative_eq!(camera.state().yaw, 330.0);
    }

    #[test]
    fn test_pan_drag_is_incremental() {
        let mut camera = OrbitCamera::default();
        camera.on_pointer_down(PixelPos::new(0, 0));
        camera.on_pan_drag(PixelPos::new(5, -3));
        camera.on_pan_drag(PixelPos::new(10, -6));

        let state = camera.state();
        assert_relative_eq!(state.pan_x, 10.0);
        assert_relative_eq!(state.pan_y, -6.0);
        assert_eq!(state.yaw, 0.0);
    }

    #[test]
    fn test_drag_without_pointer_down_only_anchors() {
        let mut camera = OrbitCamera::default();
        assert!(!camera.on_orbit_drag(PixelPos::new(50, 50)));
        assert!(camera.on_orbit_drag(PixelPos::new(60, 50)));
        assert_relative_eq!(camera.state().yaw, 350.0);
    }

    #[test]
    fn test_angles_stay_in_range() {
        let mut camera = OrbitCamera::default();
        for (dx, dy) in [(1000.0, -1000.0), (-725.0, 359.5), (0.25, -0.25), (-360.0, 360.0)] {
            camera.orbit_by(dx, dy);
            let s = camera.state();
            assert!((0.0..360.0).contains(&s.yaw), "yaw {}", s.yaw);
            assert!((0.0..360.0).contains(&s.pitch), "pitch {}", s.pitch);
        }
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = OrbitCamera::default();
        assert_eq!(camera.state().distance, 500.0);

        assert!(camera.on_zoom(WheelDirection::Forward));
        assert_eq!(camera.state().distance, 520.0);
        assert!(camera.on_zoom(WheelDirection::Backward));
        assert_eq!(camera.state().distance, 500.0);

        for _ in 0..200 {
            camera.on_zoom(WheelDirection::Forward);
            assert!(camera.state().distance <= 2000.0);
        }
        assert_eq!(camera.state().distance, 2000.0);
        assert!(!camera.on_zoom(WheelDirection::Forward));

        for _ in 0..200 {
            camera.on_zoom(WheelDirection::Backward);
            assert!(camera.state().distance >= 1.0);
        }
        assert_eq!(camera.state().distance, 1.0);
    }

    #[test]
    fn test_reset_keeps_center() {
        let mut camera = OrbitCamera::default();
        camera.set_center(Point3f::new(1.0, 2.0, 3.0));
        camera.orbit_by(30.0, 40.0);
        camera.pan_by(5.0, 5.0);
        camera.on_zoom(WheelDirection::Forward);

        camera.reset();
        let s = camera.state();
        assert_eq!((s.yaw, s.pitch, s.pan_x, s.pan_y), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(s.distance, 500.0);
        assert_eq!(camera.center(), Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_frustum_from_perspective() {
        let frustum = Frustum::from_perspective(45.0, 2.0, 1.0, 5000.0);
        let top = (22.5f32).to_radians().tan();
        assert_relative_eq!(frustum.top, top);
        assert_relative_eq!(frustum.bottom, -top);
        assert_relative_eq!(frustum.right, 2.0 * top);
        assert_relative_eq!(frustum.left, -2.0 * top);
        assert_eq!((frustum.near, frustum.far), (1.0, 5000.0));
    }

    #[test]
    fn test_frustum_matrix_maps_near_and_far_planes() {
        let m = Frustum::from_perspective(45.0, 1.0, 1.0, 5000.0).to_matrix();

        let near = m * nalgebra::Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-4);

        let far = m * nalgebra::Vector4::new(0.0, 0.0, -5000.0, 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_view_op_order() {
        let mut camera = OrbitCamera::default();
        camera.set_center(Point3f::new(1.0, 2.0, 3.0));
        camera.pan_by(4.0, 5.0);
        camera.orbit_by(-90.0, 0.0);

        let view = camera.view();
        assert_eq!(view.ops.len(), 4);
        assert_eq!(view.ops[0], ViewOp::Translate(Vector3::new(-1.0, -2.0, -3.0)));
        assert_eq!(view.ops[1], ViewOp::Translate(Vector3::new(4.0, -5.0, -500.0)));
        assert_eq!(view.ops[2], ViewOp::Rotate { angle_deg: -0.0, axis: Vector3::x() });
        assert_eq!(view.ops[3], ViewOp::Rotate { angle_deg: -90.0, axis: Vector3::y() });
    }

    #[test]
    fn test_view_matrix_dollies_center_in_front_of_camera() {
        let cloud: IntensityPointCloud = vec![
            IntensityPoint3f::new(0.0, 0.0, 0.0, 10.0),
            IntensityPoint3f::new(2.0, 0.0, 0.0, 50.0),
            IntensityPoint3f::new(0.0, 4.0, 0.0, 90.0),
        ]
        .into_iter()
        .collect();
        let camera = OrbitCamera::for_cloud(OrbitConfig::default(), &cloud);

        let view = Transform3D::from(camera.view().matrix());
        let eye = view.transform_point(&cloud.center());
        assert_relative_eq!(eye, Point3f::new(0.0, 0.0, -500.0), epsilon = 1e-3);
    }

    #[test]
    fn test_for_cloud_accepts_plain_points() {
        let points = [Point3f::new(-2.0, 0.0, 0.0), Point3f::new(2.0, 6.0, 8.0)];
        let camera = OrbitCamera::for_cloud(OrbitConfig::default(), &points[..]);
        assert_eq!(camera.center(), Point3f::new(0.0, 3.0, 4.0));
    }

    #[test]
    fn test_view_matrix_applies_yaw_before_dolly() {
        let mut camera = OrbitCamera::default();
        camera.orbit_by(-90.0, 0.0);
        assert_relative_eq!(camera.state().yaw, 90.0);

        // rotate (1,0,0) by -90 degrees about Y, then push back by distance
        let view = Transform3D::from(camera.view().matrix());
        let eye = view.transform_point(&Point3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(eye, Point3f::new(0.0, 0.0, -499.0), epsilon = 1e-3);
    }

    #[test]
    fn test_point_draw_sizes() {
        let cloud: IntensityPointCloud = vec![
            IntensityPoint3f::new(0.0, 0.0, 0.0, 250.0),
            IntensityPoint3f::new(1.0, 0.0, 0.0, 0.0),
            IntensityPoint3f::new(2.0, 0.0, 0.0, -50.0),
        ]
        .into_iter()
        .collect();

        let draws = OrbitCamera::point_draws(&cloud, [255, 255, 255]);
        let sizes: Vec<f32> = draws.iter().map(|d| d.size).collect();
        assert_eq!(sizes, vec![2.5, 0.0, -0.5]);
        assert_eq!(draws[1].position, Point3f::new(1.0, 0.0, 0.0));
    }
}
