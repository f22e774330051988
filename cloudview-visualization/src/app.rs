//! winit window back end driving the viewer sessions
//!
//! Each session gets its own window. Native events are translated into
//! [`InputHandler`] calls on the session owning the window, and a redraw is
//! requested whenever a call reports a change.

use crate::input::{ButtonMask, InputHandler, Key, KeyOutcome, PointerButton};
use crate::presenter::FramePresenter;
use crate::session::{CloudViewerSession, ImageViewerSession};
use cloudview_core::{Error, PixelPos, Result};
use image::RgbaImage;
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{Key as WinitKey, NamedKey},
    window::{Window, WindowBuilder, WindowId},
};

/// A session that can be shown in a window
pub trait ViewerSession: InputHandler {
    fn title(&self) -> String;

    fn render_frame(&self) -> RgbaImage;

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn resizable(&self) -> bool {
        false
    }
}

impl ViewerSession for ImageViewerSession {
    fn title(&self) -> String {
        self.viewport().overlay_text()
    }

    fn render_frame(&self) -> RgbaImage {
        self.render()
    }
}

impl ViewerSession for CloudViewerSession {
    fn title(&self) -> String {
        self.overlay_text()
    }

    fn render_frame(&self) -> RgbaImage {
        self.render()
    }

    fn resize(&mut self, width: u32, height: u32) {
        CloudViewerSession::resize(self, width, height);
    }

    fn resizable(&self) -> bool {
        true
    }
}

/// What the event loop should do after a window handled an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowAction {
    None,
    Redraw,
    Close,
    Quit,
}

/// Map a winit button onto the buttons the viewers use
fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn viewer_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::Escape) => Key::Quit,
        WinitKey::Character(c) => match c.as_str() {
            "q" | "Q" => Key::Quit,
            "r" | "R" => Key::Reset,
            _ => Key::Other,
        },
        _ => Key::Other,
    }
}

struct ViewerWindow {
    window: Arc<Window>,
    presenter: FramePresenter,
    session: Box<dyn ViewerSession>,
    held: ButtonMask,
    cursor: PixelPos,
}

impl ViewerWindow {
    fn open(
        target: &EventLoopWindowTarget<()>,
        session: Box<dyn ViewerSession>,
        size: (u32, u32),
    ) -> Result<Self> {
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(session.title())
                .with_inner_size(PhysicalSize::new(size.0, size.1))
                .with_resizable(session.resizable())
                .build(target)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );
        let presenter = pollster::block_on(FramePresenter::new(window.clone()))?;

        Ok(Self {
            window,
            presenter,
            session,
            held: ButtonMask::NONE,
            cursor: PixelPos::new(-1, -1),
        })
    }

    fn handle(&mut self, event: &WindowEvent) -> WindowAction {
        let changed = match event {
            WindowEvent::CloseRequested => return WindowAction::Close,
            WindowEvent::Resized(size) => {
                self.presenter.resize(*size);
                self.session.resize(size.width, size.height);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = PixelPos::new(position.x as i32, position.y as i32);
                self.session.on_pointer_move(self.cursor, self.held)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = pointer_button(*button) else {
                    return WindowAction::None;
                };
                match state {
                    ElementState::Pressed => {
                        self.held.press(button);
                        self.session.on_pointer_down(button, self.cursor)
                    }
                    ElementState::Released => {
                        self.held.release(button);
                        false
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.session.on_wheel(delta, self.cursor)
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match self.session.on_key(viewer_key(&event.logical_key)) {
                    KeyOutcome::Quit => return WindowAction::Quit,
                    KeyOutcome::Redraw => true,
                    KeyOutcome::Continue => false,
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                false
            }
            _ => false,
        };

        if changed {
            WindowAction::Redraw
        } else {
            WindowAction::None
        }
    }

    fn redraw(&mut self) {
        let frame = self.session.render_frame();
        if let Err(e) = self.presenter.present(&frame) {
            log::error!("render error: {}", e);
        }
        self.window.set_title(&self.session.title());
    }
}

/// Owns the viewer sessions and runs the event loop until quit
pub struct ViewerApp {
    image: Option<(ImageViewerSession, (u32, u32))>,
    cloud: Option<(CloudViewerSession, (u32, u32))>,
}

impl ViewerApp {
    pub fn new() -> Self {
        Self {
            image: None,
            cloud: None,
        }
    }

    /// Show the 2D image viewer
    pub fn with_image(mut self, session: ImageViewerSession) -> Self {
        let size = session.viewport().canvas_size();
        self.image = Some((session, size));
        self
    }

    /// Show the 3D point cloud viewer
    pub fn with_cloud(mut self, session: CloudViewerSession) -> Self {
        let size = session.size();
        self.cloud = Some((session, size));
        self
    }

    /// Open one window per session and dispatch events until the quit key
    /// is pressed or every window is closed
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;

        let mut windows: Vec<ViewerWindow> = Vec::new();
        if let Some((session, size)) = self.image {
            windows.push(ViewerWindow::open(&event_loop, Box::new(session), size)?);
        }
        if let Some((session, size)) = self.cloud {
            windows.push(ViewerWindow::open(&event_loop, Box::new(session), size)?);
        }
        if windows.is_empty() {
            log::warn!("no viewer to show");
            return Ok(());
        }
        log::info!("opened {} viewer window(s)", windows.len());

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { window_id, event } = event else {
                    return;
                };
                let Some(index) = window_index(&windows, window_id) else {
                    return;
                };

                match windows[index].handle(&event) {
                    WindowAction::None => {}
                    WindowAction::Redraw => windows[index].window.request_redraw(),
                    WindowAction::Close => {
                        windows.remove(index);
                        if windows.is_empty() {
                            target.exit();
                        }
                    }
                    WindowAction::Quit => {
                        log::info!("quit requested");
                        windows.clear();
                        target.exit();
                    }
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        Ok(())
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

fn window_index(windows: &[ViewerWindow], id: WindowId) -> Option<usize> {
    windows.iter().position(|w| w.window.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_button_mapping() {
        assert_eq!(pointer_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(MouseButton::Middle), None);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(viewer_key(&WinitKey::Named(NamedKey::Escape)), Key::Quit);
        assert_eq!(viewer_key(&WinitKey::Character(SmolStr::new("q"))), Key::Quit);
        assert_eq!(viewer_key(&WinitKey::Character(SmolStr::new("R"))), Key::Reset);
        assert_eq!(viewer_key(&WinitKey::Character(SmolStr::new("x"))), Key::Other);
        assert_eq!(viewer_key(&WinitKey::Named(NamedKey::Enter)), Key::Other);
    }
}
