use cgmath::{Matrix4, Vector3, Zero};

use super::trackball::Trackball;

/// World offset plus a trackball orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    distance: f32,
    trackball: Trackball,
}

impl Camera {
    pub const DEFAULT_DISTANCE: f32 = 2.0;

    pub fn new(position: Vector3<f32>, distance: f32) -> Self {
        Self {
            position,
            distance,
            trackball: Trackball::new(0.0, distance),
        }
    }

    /// Moves the camera by `(x, y, z)`. Unlike [`Shape::translate`] this
    /// accumulates.
    ///
    /// [`Shape::translate`]: crate::gfx::scene::Shape::translate
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.position += Vector3::new(x, y, z);
    }

    /// Orientation from the trackball.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.trackball.matrix()
    }

    /// `translation(position) * matrix()`, the view matrix handed to the
    /// scene each frame.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * self.matrix()
    }

    /// Pull-back distance used by the projection.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn trackball(&self) -> &Trackball {
        &self.trackball
    }

    pub fn trackball_mut(&mut self) -> &mut Trackball {
        &mut self.trackball
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zero(), Self::DEFAULT_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{AbsDiffEq, SquareMatrix, Vector4};

    #[test]
    fn default_camera_rests_at_origin() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vector3::zero());
        assert_eq!(camera.distance(), 2.0);
        assert_eq!(camera.trackball().distance(), 2.0);
        assert!(camera.view_matrix().abs_diff_eq(&Matrix4::identity(), 1e-6));
    }

    #[test]
    fn translate_accumulates() {
        let mut camera = Camera::default();
        camera.translate(0.0, 0.0, 1.0);
        camera.translate(0.0, 0.0, 1.0);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn view_translates_after_rotating() {
        let mut camera = Camera::default();
        camera.translate(1.0, 0.0, 0.0);
        camera.trackball_mut().drag_to(0.0, 0.0, 0.3, 0.0);

        let origin = camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.abs_diff_eq(&Vector4::new(1.0, 0.0, 0.0, 1.0), 1e-6));
        assert_eq!(
            camera.view_matrix(),
            Matrix4::from_translation(camera.position) * camera.matrix()
        );
    }
}
