use cgmath::Matrix4;
use log::{debug, trace};

use super::input::{Action, InputEvent, KEY_ESCAPE, MAX_KEYS, MAX_MOUSE_BUTTONS, MOUSE_BUTTON_MIDDLE};
use super::surface::InteractionSurface;
use crate::error::InteractionError;
use crate::gfx::camera::Camera;

const REST_TOLERANCE: f32 = 1e-6;

/// Maps raw input onto the active camera.
///
/// Cursor locations are stored in surface pixels with the origin at the
/// bottom-left corner.
#[derive(Debug, Clone)]
pub struct Interaction {
    cameras: Vec<Camera>,
    active_camera: usize,
    key_pressed: Vec<bool>,
    mouse_button_pressed: [bool; MAX_MOUSE_BUTTONS],
    mouse_location: Option<(f64, f64)>,
    pub zoom_sensitivity: f32,
    pub x_move_sensitivity: f32,
    pub y_move_sensitivity: f32,
}

impl Interaction {
    pub const DEFAULT_ZOOM_SENSITIVITY: f32 = 0.1;
    pub const DEFAULT_MOVE_SENSITIVITY: f32 = 0.20;

    /// One default camera and default sensitivities.
    pub fn new() -> Self {
        Self {
            cameras: vec![Camera::default()],
            active_camera: 0,
            key_pressed: vec![false; MAX_KEYS],
            mouse_button_pressed: [false; MAX_MOUSE_BUTTONS],
            mouse_location: None,
            zoom_sensitivity: Self::DEFAULT_ZOOM_SENSITIVITY,
            x_move_sensitivity: Self::DEFAULT_MOVE_SENSITIVITY,
            y_move_sensitivity: Self::DEFAULT_MOVE_SENSITIVITY,
        }
    }

    pub fn with_sensitivity(mut self, zoom: f32, x_move: f32, y_move: f32) -> Self {
        self.zoom_sensitivity = zoom;
        self.x_move_sensitivity = x_move;
        self.y_move_sensitivity = y_move;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.cameras[self.active_camera]
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active_camera]
    }

    /// Adds a camera and returns its index. The active camera is unchanged.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn set_active_camera(&mut self, index: usize) -> Result<(), InteractionError> {
        if index >= self.cameras.len() {
            return Err(InteractionError::CameraOutOfRange {
                index,
                count: self.cameras.len(),
            });
        }
        self.active_camera = index;
        Ok(())
    }

    pub fn active_camera(&self) -> usize {
        self.active_camera
    }

    /// Moves the active camera; see [`Camera::translate`].
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.camera_mut().translate(x, y, z);
    }

    /// Orientation of the active camera.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.camera().matrix()
    }

    /// `false` for codes outside the key table.
    pub fn is_key_pressed(&self, code: u32) -> bool {
        self.key_pressed.get(code as usize).copied().unwrap_or(false)
    }

    /// `false` for codes outside the button table.
    pub fn is_mouse_button_pressed(&self, button: u32) -> bool {
        self.mouse_button_pressed
            .get(button as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn mouse_location(&self) -> Option<(f64, f64)> {
        self.mouse_location
    }

    /// Applies one input event.
    ///
    /// Only a mouse button code outside the button table is an error; every
    /// other malformed input is ignored.
    pub fn handle<S: InteractionSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        event: &InputEvent,
    ) -> Result<(), InteractionError> {
        match *event {
            InputEvent::Key { code, action } => self.handle_key(surface, code, action),
            InputEvent::MouseButton { button, action } => {
                self.handle_mouse_button(surface, button, action)?
            }
            InputEvent::Scroll { y, .. } => self.handle_scroll(y),
            InputEvent::CursorMoved { x, y } => self.handle_mouse_move(surface, x, y),
        }
        Ok(())
    }

    fn handle_key<S: InteractionSurface + ?Sized>(&mut self, surface: &mut S, code: u32, action: Action) {
        if code == KEY_ESCAPE && action == Action::Press {
            debug!("Escape pressed, requesting close");
            surface.request_close();
        }

        let Some(pressed) = self.key_pressed.get_mut(code as usize) else {
            trace!("Ignoring key code {} outside the key table", code);
            return;
        };
        match action {
            Action::Press => *pressed = true,
            Action::Release => *pressed = false,
            Action::Repeat => {}
        }
    }

    fn handle_mouse_button<S: InteractionSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        button: u32,
        action: Action,
    ) -> Result<(), InteractionError> {
        if button as usize >= MAX_MOUSE_BUTTONS {
            return Err(InteractionError::MouseButtonOutOfRange {
                button,
                max: MAX_MOUSE_BUTTONS,
            });
        }

        let (_, height) = surface.size();
        if let Some((x, y)) = surface.cursor_position() {
            self.mouse_location = Some((x, height as f64 - y));
        }

        match action {
            Action::Press => self.mouse_button_pressed[button as usize] = true,
            Action::Release => self.mouse_button_pressed[button as usize] = false,
            Action::Repeat => {}
        }
        Ok(())
    }

    fn handle_scroll(&mut self, yoff: f64) {
        let camera = self.camera();
        let position = camera.position;
        let pull_back = camera.distance() - position.z;

        let at_rest = position.x.abs() <= REST_TOLERANCE
            && position.y.abs() <= REST_TOLERANCE
            && (pull_back - camera.distance()).abs() <= REST_TOLERANCE;

        if at_rest && yoff > 0.0 {
            trace!("Camera at rest, ignoring outward scroll");
            return;
        }

        self.translate(0.0, 0.0, yoff as f32 * self.zoom_sensitivity);
    }

    fn handle_mouse_move<S: InteractionSurface + ?Sized>(&mut self, surface: &mut S, x: f64, y: f64) {
        let (width, height) = surface.size();
        let (width, height) = (width as f64, height as f64);
        let mut x = x;
        let mut y = height - y;

        if let (true, Some((last_x, last_y))) = (
            self.mouse_button_pressed[MOUSE_BUTTON_MIDDLE as usize],
            self.mouse_location,
        ) {
            let dx = (x - last_x) * self.x_move_sensitivity as f64;
            let dy = (y - last_y) * self.y_move_sensitivity as f64;
            let (wrapped_x, wrapped_y, dx, dy) = wrap_around(surface, width, height, x, y, dx, dy);
            x = wrapped_x;
            y = wrapped_y;

            if width > 0.0 && height > 0.0 {
                let to_unit = |v: f64, extent: f64| (2.0 * v / extent - 1.0) as f32;
                self.camera_mut().trackball_mut().drag_to(
                    to_unit(last_x, width),
                    to_unit(last_y, height),
                    (2.0 * dx / width) as f32,
                    (2.0 * dy / height) as f32,
                );
            }
        }

        self.mouse_location = Some((x, y));
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves a cursor that reached an edge to the opposite edge and cancels the
/// delta of that move. Coordinates have their origin at the bottom-left.
fn wrap_around<S: InteractionSurface + ?Sized>(
    surface: &mut S,
    width: f64,
    height: f64,
    mut x: f64,
    mut y: f64,
    dx: f64,
    dy: f64,
) -> (f64, f64, f64, f64) {
    let mut wrapped = false;

    if x <= 0.0 {
        x = width - 1.0;
        wrapped = true;
    } else if x >= width {
        x = 0.0;
        wrapped = true;
    }

    if y <= 0.0 {
        y = height - 1.0;
        wrapped = true;
    } else if y >= height {
        y = 0.0;
        wrapped = true;
    }

    if wrapped {
        surface.set_cursor_position(x, height - y);
        return (x, y, 0.0, 0.0);
    }

    (x, y, dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::input::MOUSE_BUTTON_LEFT;
    use cgmath::Vector3;

    struct FakeSurface {
        size: (u32, u32),
        cursor: Option<(f64, f64)>,
        warps: Vec<(f64, f64)>,
        close_requested: bool,
    }

    impl FakeSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                cursor: None,
                warps: Vec::new(),
                close_requested: false,
            }
        }
    }

    impl InteractionSurface for FakeSurface {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn cursor_position(&self) -> Option<(f64, f64)> {
            self.cursor
        }

        fn set_cursor_position(&mut self, x: f64, y: f64) {
            self.cursor = Some((x, y));
            self.warps.push((x, y));
        }

        fn request_close(&mut self) {
            self.close_requested = true;
        }
    }

    fn press_middle_at(interaction: &mut Interaction, surface: &mut FakeSurface, x: f64, y: f64) {
        surface.cursor = Some((x, y));
        interaction
            .handle(
                surface,
                &InputEvent::MouseButton {
                    button: MOUSE_BUTTON_MIDDLE,
                    action: Action::Press,
                },
            )
            .unwrap();
    }

    #[test]
    fn escape_requests_close() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        interaction
            .handle(&mut surface, &InputEvent::Key { code: KEY_ESCAPE, action: Action::Press })
            .unwrap();
        assert!(surface.close_requested);
        assert!(interaction.is_key_pressed(KEY_ESCAPE));
    }

    #[test]
    fn key_table_tracks_press_and_release() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        interaction
            .handle(&mut surface, &InputEvent::Key { code: 65, action: Action::Press })
            .unwrap();
        assert!(interaction.is_key_pressed(65));
        interaction
            .handle(&mut surface, &InputEvent::Key { code: 65, action: Action::Release })
            .unwrap();
        assert!(!interaction.is_key_pressed(65));
        assert!(!surface.close_requested);
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        let result = interaction.handle(
            &mut surface,
            &InputEvent::Key {
                code: MAX_KEYS as u32 + 10,
                action: Action::Press,
            },
        );
        assert!(result.is_ok());
        assert!(!interaction.is_key_pressed(MAX_KEYS as u32 + 10));
    }

    #[test]
    fn out_of_range_mouse_buttons_are_rejected() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        let result = interaction.handle(
            &mut surface,
            &InputEvent::MouseButton {
                button: 32,
                action: Action::Press,
            },
        );
        assert_eq!(
            result,
            Err(InteractionError::MouseButtonOutOfRange { button: 32, max: 32 })
        );
    }

    #[test]
    fn button_events_record_flipped_cursor() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        surface.cursor = Some((100.0, 150.0));
        interaction
            .handle(
                &mut surface,
                &InputEvent::MouseButton {
                    button: MOUSE_BUTTON_LEFT,
                    action: Action::Press,
                },
            )
            .unwrap();

        assert!(interaction.is_mouse_button_pressed(MOUSE_BUTTON_LEFT));
        assert_eq!(interaction.mouse_location(), Some((100.0, 450.0)));
    }

    #[test]
    fn scroll_out_at_rest_is_suppressed() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        interaction
            .handle(&mut surface, &InputEvent::Scroll { x: 0.0, y: 1.0 })
            .unwrap();
        assert_eq!(interaction.camera().position, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn scroll_in_moves_by_sensitivity() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        interaction
            .handle(&mut surface, &InputEvent::Scroll { x: 0.0, y: -1.0 })
            .unwrap();
        assert!((interaction.camera().position.z - -0.1).abs() < 1e-6);

        // Away from rest, scrolling out is allowed again.
        interaction
            .handle(&mut surface, &InputEvent::Scroll { x: 0.0, y: 2.0 })
            .unwrap();
        assert!((interaction.camera().position.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn drag_with_middle_button_rotates_trackball() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        press_middle_at(&mut interaction, &mut surface, 400.0, 300.0);

        let before = interaction.matrix();
        interaction
            .handle(&mut surface, &InputEvent::CursorMoved { x: 450.0, y: 300.0 })
            .unwrap();

        assert_ne!(interaction.matrix(), before);
        assert_eq!(interaction.mouse_location(), Some((450.0, 300.0)));
    }

    #[test]
    fn moves_without_middle_button_only_track_cursor() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        let before = interaction.matrix();

        interaction
            .handle(&mut surface, &InputEvent::CursorMoved { x: 10.0, y: 20.0 })
            .unwrap();

        assert_eq!(interaction.matrix(), before);
        assert_eq!(interaction.mouse_location(), Some((10.0, 580.0)));
        assert!(surface.warps.is_empty());
    }

    #[test]
    fn reaching_right_edge_wraps_with_zero_delta() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        press_middle_at(&mut interaction, &mut surface, 790.0, 300.0);
        let before = interaction.matrix();

        interaction
            .handle(&mut surface, &InputEvent::CursorMoved { x: 800.0, y: 300.0 })
            .unwrap();

        assert_eq!(interaction.mouse_location(), Some((0.0, 300.0)));
        assert_eq!(interaction.matrix(), before);
        assert_eq!(surface.warps, vec![(0.0, 300.0)]);
    }

    #[test]
    fn reaching_left_edge_wraps_to_last_column() {
        let mut interaction = Interaction::new();
        let mut surface = FakeSurface::new(800, 600);
        press_middle_at(&mut interaction, &mut surface, 5.0, 300.0);

        interaction
            .handle(&mut surface, &InputEvent::CursorMoved { x: 0.0, y: 300.0 })
            .unwrap();

        assert_eq!(interaction.mouse_location(), Some((799.0, 300.0)));
    }

    #[test]
    fn cameras_can_be_switched() {
        let mut interaction = Interaction::new();
        let index = interaction.add_camera(Camera::new(Vector3::new(1.0, 0.0, 0.0), 5.0));
        assert_eq!(interaction.active_camera(), 0);

        interaction.set_active_camera(index).unwrap();
        assert_eq!(interaction.camera().distance(), 5.0);
        assert_eq!(
            interaction.set_active_camera(7),
            Err(InteractionError::CameraOutOfRange { index: 7, count: 2 })
        );
    }
}
