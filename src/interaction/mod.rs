//! Input subsystem.
//!
//! [`Interaction`] owns the cameras and turns key, mouse button, scroll and
//! cursor events into camera translation and trackball drags. Events are
//! platform-agnostic; [`platform`] translates winit window events into them.

pub mod controller;
pub mod input;
pub mod platform;
pub mod surface;

pub use controller::Interaction;
pub use input::{Action, InputEvent};
pub use platform::translate_window_event;
pub use surface::{InteractionSurface, WinitSurface};
