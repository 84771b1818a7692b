//! Platform-agnostic input events consumed by [`Interaction`](super::Interaction).

/// Size of the pressed-key table; larger codes are ignored.
pub const MAX_KEYS: usize = 1024;

/// Size of the pressed-button table; larger codes are rejected.
pub const MAX_MOUSE_BUTTONS: usize = 32;

/// Code the platform layer reports for the Escape key.
pub const KEY_ESCAPE: u32 = 256;

pub const MOUSE_BUTTON_LEFT: u32 = 0;
pub const MOUSE_BUTTON_RIGHT: u32 = 1;
pub const MOUSE_BUTTON_MIDDLE: u32 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

/// A raw input event. Cursor positions are surface pixels with the origin
/// at the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key { code: u32, action: Action },
    MouseButton { button: u32, action: Action },
    /// Scroll amount in lines.
    Scroll { x: f64, y: f64 },
    CursorMoved { x: f64, y: f64 },
}
