//! Input capability interface between a window back end and the viewers
//!
//! Back ends translate their native events into these calls; the camera
//! and viewport controllers never see back-end types.

use cloudview_core::PixelPos;

/// Pointer buttons the viewers react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Set of pointer buttons currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const PRIMARY: ButtonMask = ButtonMask(1);
    pub const SECONDARY: ButtonMask = ButtonMask(1 << 1);

    pub fn contains(self, button: PointerButton) -> bool {
        self.0 & Self::from(button).0 != 0
    }

    pub fn press(&mut self, button: PointerButton) {
        self.0 |= Self::from(button).0;
    }

    pub fn release(&mut self, button: PointerButton) {
        self.0 &= !Self::from(button).0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<PointerButton> for ButtonMask {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => ButtonMask::PRIMARY,
            PointerButton::Secondary => ButtonMask::SECONDARY,
        }
    }
}

impl std::ops::BitOr for ButtonMask {
    type Output = ButtonMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ButtonMask(self.0 | rhs.0)
    }
}

/// Direction of one wheel notch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    /// Wheel rotated away from the user
    Forward,
    /// Wheel rotated towards the user
    Backward,
}

impl WheelDirection {
    /// Sign of a wheel delta; `None` for a zero delta.
    ///
    /// A zero delta carries no direction, so it is not read as a zoom-in
    /// notch; callers ignore it.
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(WheelDirection::Forward)
        } else if delta < 0.0 {
            Some(WheelDirection::Backward)
        } else {
            None
        }
    }
}

/// Keys with a meaning to the viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    Reset,
    Other,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    /// The key changed the view
    Redraw,
    Quit,
}

/// Event sink implemented by each viewer session.
///
/// Every method returns `true` when the view changed and needs a redraw.
pub trait InputHandler {
    fn on_pointer_down(&mut self, button: PointerButton, pos: PixelPos) -> bool;

    fn on_pointer_move(&mut self, pos: PixelPos, held: ButtonMask) -> bool;

    fn on_wheel(&mut self, delta: f32, pos: PixelPos) -> bool;

    fn on_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Quit => KeyOutcome::Quit,
            _ => KeyOutcome::Continue,
        }
    }
}
