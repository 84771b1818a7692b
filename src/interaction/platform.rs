use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::input::{Action, InputEvent, KEY_ESCAPE};

/// Pixels per scroll line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f64 = 20.0;

/// Translates a winit `WindowEvent` into an [`InputEvent`].
///
/// Returns `None` for events the interaction layer does not handle.
pub fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let action = match (event.state, event.repeat) {
                (ElementState::Pressed, false) => Action::Press,
                (ElementState::Pressed, true) => Action::Repeat,
                (ElementState::Released, _) => Action::Release,
            };
            Some(InputEvent::Key {
                code: map_key(code),
                action,
            })
        }

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: map_mouse_button(*button),
            action: match state {
                ElementState::Pressed => Action::Press,
                ElementState::Released => Action::Release,
            },
        }),

        WindowEvent::MouseWheel { delta, .. } => {
            let (x, y) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x as f64, *y as f64),
                MouseScrollDelta::PixelDelta(p) => (p.x / PIXELS_PER_LINE, p.y / PIXELS_PER_LINE),
            };
            Some(InputEvent::Scroll { x, y })
        }

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),

        _ => None,
    }
}

fn map_key(code: KeyCode) -> u32 {
    match code {
        KeyCode::Escape => KEY_ESCAPE,
        other => other as u32,
    }
}

fn map_mouse_button(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(v) => v as u32,
    }
}
