//! Frame driver tying the scene, the shader program and the input state together.

use cgmath::{Matrix4, SquareMatrix};
use log::{debug, info};

use crate::config::ViewerConfig;
use crate::error::{InteractionError, ViewerError};
use crate::gfx::rendering::GraphicsBackend;
use crate::gfx::scene::{Scene, Shape};
use crate::gfx::shader::{ShaderInterface, ShaderProgram, PROJECTION_UNIFORM};
use crate::gfx::transform::{perspective, translation};
use crate::interaction::{InputEvent, Interaction, InteractionSurface};

/// Owns everything drawn in a window and redraws it on demand.
pub struct Viewer {
    scene: Scene,
    program: ShaderProgram,
    interaction: Interaction,
    config: ViewerConfig,
    projection: Matrix4<f32>,
    last_width: u32,
    last_height: u32,
}

impl Viewer {
    /// Validates `config`, links the viewer shaders and builds a scene
    /// holding a single cube.
    pub fn new<B: GraphicsBackend>(backend: &mut B, config: ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;

        let program = ShaderProgram::from_paths(
            backend,
            Some(&config.vertex_shader),
            Some(&config.fragment_shader),
            &ShaderInterface::viewer(),
        )?;

        let mut scene = Scene::with_background(config.background);
        scene.add_shape(Shape::cube(backend)?);

        let interaction = Interaction::new().with_sensitivity(
            config.zoom_sensitivity,
            config.x_move_sensitivity,
            config.y_move_sensitivity,
        );

        info!(
            "Viewer '{}' ready at {}x{}",
            config.title, config.width, config.height
        );

        // Offset by one so the first frame always computes a projection.
        let last_width = config.width - 1;
        let last_height = config.height - 1;

        Ok(Self {
            scene,
            program,
            interaction,
            config,
            projection: Matrix4::identity(),
            last_width,
            last_height,
        })
    }

    /// Draws one frame at the given surface size.
    ///
    /// A zero height skips the frame. The projection is only recomputed when
    /// both dimensions differ from the last observed size, so a change to a
    /// single dimension is picked up by [`resize`](Self::resize) instead.
    pub fn render_frame<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<(), ViewerError> {
        if height == 0 {
            return Ok(());
        }

        backend.begin_frame();
        self.program.use_program(backend);

        if width != self.last_width && height != self.last_height {
            self.update_projection(backend, width, height)?;
        }

        let view = self.interaction.camera().view_matrix();
        self.scene.render(backend, &self.program, view)?;

        ShaderProgram::end_use(backend);
        backend.end_frame()?;
        Ok(())
    }

    /// Window resize: always updates the viewport and projection.
    pub fn resize<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<(), ViewerError> {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        self.update_projection(backend, width, height)
    }

    pub fn handle_input<S: InteractionSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        event: &InputEvent,
    ) -> Result<(), InteractionError> {
        self.interaction.handle(surface, event)
    }

    fn update_projection<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
    ) -> Result<(), ViewerError> {
        backend.set_viewport(width, height);

        let aspect = width as f32 / height as f32;
        self.projection = perspective(self.config.fov, aspect, self.config.near, self.config.far)
            * translation(0.0, 0.0, -self.interaction.camera().distance());
        self.program.set(backend, PROJECTION_UNIFORM, self.projection)?;

        self.last_width = width;
        self.last_height = height;
        debug!("Projection updated for {}x{}", width, height);
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Last size the projection was computed for.
    pub fn last_size(&self) -> (u32, u32) {
        (self.last_width, self.last_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::recording::{Call, RecordingBackend};
    use crate::gfx::shader::MODELVIEW_UNIFORM;
    use crate::gfx::transform::matrix4_to_array;
    use cgmath::{InnerSpace, Vector3};

    struct StillSurface;

    impl InteractionSurface for StillSurface {
        fn size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn cursor_position(&self) -> Option<(f64, f64)> {
            None
        }

        fn set_cursor_position(&mut self, _x: f64, _y: f64) {}

        fn request_close(&mut self) {}
    }

    fn viewer(backend: &mut RecordingBackend) -> Viewer {
        Viewer::new(backend, ViewerConfig::default().with_size(800, 600)).unwrap()
    }

    fn viewports(backend: &RecordingBackend) -> Vec<(u32, u32)> {
        backend
            .calls()
            .iter()
            .filter_map(|call| match call {
                Call::Viewport(w, h) => Some((*w, *h)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let mut backend = RecordingBackend::new();
        let zero = Viewer::new(&mut backend, ViewerConfig::default().with_size(800, 0));
        assert!(matches!(zero, Err(ViewerError::InvalidDimensions { .. })));

        let untitled = Viewer::new(&mut backend, ViewerConfig::default().with_title(""));
        assert!(matches!(untitled, Err(ViewerError::MissingTitle)));
    }

    #[test]
    fn missing_shader_file_is_reported() {
        let mut backend = RecordingBackend::new();
        let config = ViewerConfig::default().with_shader_dir("no/such/dir");
        assert!(matches!(
            Viewer::new(&mut backend, config),
            Err(ViewerError::Shader(_))
        ));
    }

    #[test]
    fn first_frame_sets_projection_and_draws_the_cube() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);
        assert_eq!(viewer.last_size(), (799, 599));

        viewer.render_frame(&mut backend, 800, 600).unwrap();

        assert_eq!(viewports(&backend), vec![(800, 600)]);
        assert_eq!(viewer.last_size(), (800, 600));
        let draws = backend.draws();
        assert_eq!(draws.len(), 1);
        assert!(matches!(draws[0], Call::Draw { index_count: 36, .. }));
        assert_eq!(backend.calls().first(), Some(&Call::CreateProgram(viewer.program().id())));
        assert_eq!(backend.calls().last(), Some(&Call::EndFrame));
    }

    #[test]
    fn projection_pulls_back_by_camera_distance() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);
        viewer.render_frame(&mut backend, 800, 600).unwrap();

        let expected = perspective(70.0, 800.0 / 600.0, 0.1, 800.0) * translation(0.0, 0.0, -2.0);
        assert_eq!(viewer.projection(), expected);
    }

    #[test]
    fn single_dimension_change_is_missed_by_the_frame_loop() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);
        viewer.render_frame(&mut backend, 800, 600).unwrap();

        viewer.render_frame(&mut backend, 800, 700).unwrap();
        assert_eq!(viewports(&backend), vec![(800, 600)]);
        assert_eq!(viewer.last_size(), (800, 600));

        viewer.render_frame(&mut backend, 1024, 768).unwrap();
        assert_eq!(viewports(&backend), vec![(800, 600), (1024, 768)]);
    }

    #[test]
    fn resize_event_always_updates() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);
        viewer.render_frame(&mut backend, 800, 600).unwrap();

        viewer.resize(&mut backend, 800, 700).unwrap();
        assert_eq!(viewports(&backend), vec![(800, 600), (800, 700)]);
        assert_eq!(viewer.last_size(), (800, 700));
    }

    #[test]
    fn zero_height_skips_the_frame() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);
        backend.clear_calls();

        viewer.render_frame(&mut backend, 800, 0).unwrap();
        viewer.resize(&mut backend, 800, 0).unwrap();
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn scroll_moves_the_view() {
        let mut backend = RecordingBackend::new();
        let mut viewer = viewer(&mut backend);

        viewer
            .handle_input(&mut StillSurface, &InputEvent::Scroll { x: 0.0, y: -1.0 })
            .unwrap();
        viewer.render_frame(&mut backend, 800, 600).unwrap();

        let camera = viewer.interaction().camera();
        assert!((camera.position - Vector3::new(0.0, 0.0, -0.1)).magnitude() < 1e-6);

        let location = backend.location(MODELVIEW_UNIFORM).unwrap();
        let model = viewer.scene().shapes()[0].model_matrix();
        assert!(backend.calls().contains(&Call::UniformMatrix4 {
            location,
            matrix: matrix4_to_array(camera.view_matrix() * model),
        }));
    }
}
