//! Pan/zoom controller for placing a scaled image on a fixed canvas
//!
//! Scale and pan are applied in two stages: the caller resamples the source
//! at [`ViewportController::scale`], then places the result on the canvas
//! with the translation from [`ViewportController::build_transform`].
//! [`ViewportController::visible_region`] limits the resampling to the part
//! of the source that lands on the canvas.

use crate::config::ViewportConfig;
use crate::input::WheelDirection;
use cloudview_core::{Affine2D, PixelPos};
use nalgebra::{Point2, Vector2};

/// Pan offset in canvas pixels and uniform scale (always > 0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState2D {
    pub pan: Vector2<i32>,
    pub scale: f32,
}

impl Default for ViewportState2D {
    fn default() -> Self {
        Self {
            pan: Vector2::zeros(),
            scale: 1.0,
        }
    }
}

/// Part of the source that lands on the canvas at the current pan and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRegion {
    /// Source rectangle `(x, y, width, height)` in source pixels
    pub source: (u32, u32, u32, u32),
    /// Size the rectangle is resampled to
    pub scaled_size: (u32, u32),
    /// Canvas position of the rectangle's top-left corner
    pub offset: Vector2<f32>,
}

/// Per-gesture anchor, created on button-down and replaced by the next one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<S> {
    pub anchor_pointer_pos: PixelPos,
    pub anchor_state_snapshot: S,
}

/// Affine viewport controller.
///
/// Drags are absolute: the pan during a drag is always the pan at
/// button-down plus the pointer offset from where the button went down.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState2D,
    canvas_width: u32,
    canvas_height: u32,
    scale_step: f32,
    min_scale: f32,
    max_scale: f32,
    drag: Option<DragSession<Vector2<i32>>>,
}

impl ViewportController {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            state: ViewportState2D::default(),
            canvas_width: config.width,
            canvas_height: config.height,
            scale_step: config.scale_step,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            drag: None,
        }
    }

    pub fn state(&self) -> ViewportState2D {
        self.state
    }

    pub fn pan(&self) -> Vector2<i32> {
        self.state.pan
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn drag_session(&self) -> Option<&DragSession<Vector2<i32>>> {
        self.drag.as_ref()
    }

    /// Whether `pos` lies on the canvas
    pub fn contains(&self, pos: PixelPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as i64) < self.canvas_width as i64
            && (pos.y as i64) < self.canvas_height as i64
    }

    /// Anchor a new drag at `pos`, replacing any previous session.
    /// Returns false, leaving the old session, if `pos` is off the canvas.
    pub fn on_drag_start(&mut self, pos: PixelPos) -> bool {
        if !self.contains(pos) {
            return false;
        }
        self.drag = Some(DragSession {
            anchor_pointer_pos: pos,
            anchor_state_snapshot: self.state.pan,
        });
        true
    }

    /// Move the image with the pointer. Only valid while the primary button
    /// is held; the caller checks the button mask.
    pub fn on_drag(&mut self, pos: PixelPos) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let Some(session) = self.drag else {
            return false;
        };

        let snapshot = session.anchor_state_snapshot;
        let offset = pos - session.anchor_pointer_pos;
        let pan = Vector2::new(
            snapshot.x.saturating_add(offset.x),
            snapshot.y.saturating_add(offset.y),
        );
        if pan == self.state.pan {
            return false;
        }
        self.state.pan = pan;
        log::debug!("viewport pan ({}, {})", pan.x, pan.y);
        true
    }

    /// One wheel notch, keeping the image pixel under `pos` fixed on screen.
    ///
    /// Scale stays within the configured range; a notch at either end of
    /// the range changes nothing and returns false.
    pub fn on_zoom(&mut self, direction: WheelDirection, pos: PixelPos) -> bool {
        if !self.contains(pos) {
            return false;
        }

        let step = match direction {
            WheelDirection::Forward => self.scale_step,
            WheelDirection::Backward => -self.scale_step,
        };
        let scale = (self.state.scale * (1.0 + step)).clamp(self.min_scale, self.max_scale);
        if scale == self.state.scale {
            return false;
        }
        let factor = f64::from(scale) / f64::from(self.state.scale);
        self.state.scale = scale;

        // float to int `as` saturates, so pan can never wrap
        let pan = &mut self.state.pan;
        pan.x = (f64::from(pos.x) + (f64::from(pan.x) - f64::from(pos.x)) * factor) as i32;
        pan.y = (f64::from(pos.y) + (f64::from(pan.y) - f64::from(pos.y)) * factor) as i32;

        log::debug!(
            "viewport zoom x{:.3} at ({}, {}) -> scale {:.4}, pan ({}, {})",
            factor,
            pos.x,
            pos.y,
            self.state.scale,
            pan.x,
            pan.y
        );
        true
    }

    /// 2x3 affine placing the already-resampled image on the canvas:
    /// identity linear part, translation = pan.
    pub fn build_transform(&self) -> Affine2D {
        Affine2D::translation(self.state.pan.x as f32, self.state.pan.y as f32)
    }

    /// The part of a `source_size` image that is on the canvas, or `None`
    /// if the image is panned entirely off it.
    ///
    /// The resampled size is at most the canvas size plus two source pixels
    /// at the current scale, however far the view is zoomed in.
    pub fn visible_region(&self, source_size: (u32, u32)) -> Option<VisibleRegion> {
        let scale = self.state.scale;
        let (x, width, offset_x, scaled_width) =
            visible_span(self.state.pan.x, self.canvas_width, source_size.0, scale)?;
        let (y, height, offset_y, scaled_height) =
            visible_span(self.state.pan.y, self.canvas_height, source_size.1, scale)?;

        Some(VisibleRegion {
            source: (x, y, width, height),
            scaled_size: (scaled_width, scaled_height),
            offset: Vector2::new(offset_x, offset_y),
        })
    }

    /// Source-image coordinates of the canvas pixel `pos`
    pub fn screen_to_source(&self, pos: PixelPos) -> Point2<f32> {
        Point2::new(
            (pos.x as f32 - self.state.pan.x as f32) / self.state.scale,
            (pos.y as f32 - self.state.pan.y as f32) / self.state.scale,
        )
    }

    /// Text shown over the canvas
    pub fn overlay_text(&self) -> String {
        format!("ROI RECT X = {}, Y = {}", self.state.pan.x, self.state.pan.y)
    }
}

/// Visible source span along one axis: first source pixel, pixel count,
/// canvas offset of the first pixel and resampled length.
fn visible_span(pan: i32, canvas: u32, source: u32, scale: f32) -> Option<(u32, u32, f32, u32)> {
    let scale = f64::from(scale);
    let pan = f64::from(pan);

    let first = (-pan / scale).floor().max(0.0);
    let last = ((f64::from(canvas) - pan) / scale).ceil().min(f64::from(source));
    if first >= last {
        return None;
    }

    let scaled = ((last - first) * scale).round().max(1.0);
    Some((
        first as u32,
        (last - first) as u32,
        (pan + first * scale) as f32,
        scaled as u32,
    ))
}
