use std::sync::Arc;

use log::warn;
use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;
use winit::window::Window;

/// The window an [`Interaction`](super::Interaction) drives.
pub trait InteractionSurface {
    /// Size in pixels.
    fn size(&self) -> (u32, u32);

    /// Last known cursor position, origin top-left.
    fn cursor_position(&self) -> Option<(f64, f64)>;

    /// Moves the cursor, origin top-left.
    fn set_cursor_position(&mut self, x: f64, y: f64);

    fn request_close(&mut self);
}

/// [`InteractionSurface`] over a winit window.
///
/// winit cannot be asked where the cursor is, so the position is tracked from
/// `CursorMoved` events passed to [`track`](Self::track).
pub struct WinitSurface {
    window: Arc<Window>,
    cursor: Option<(f64, f64)>,
    close_requested: bool,
}

impl WinitSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            cursor: None,
            close_requested: false,
        }
    }

    pub fn track(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor = Some((position.x, position.y)),
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            _ => {}
        }
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl InteractionSurface for WinitSurface {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    fn set_cursor_position(&mut self, x: f64, y: f64) {
        if let Err(error) = self.window.set_cursor_position(PhysicalPosition::new(x, y)) {
            warn!("Could not move the cursor: {}", error);
        }
        self.cursor = Some((x, y));
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }
}
