use cgmath::Matrix4;
use log::debug;

use super::shape::Shape;
use crate::error::ShaderError;
use crate::gfx::color::Color;
use crate::gfx::rendering::backend::GraphicsBackend;
use crate::gfx::shader::ShaderProgram;

/// Ordered shapes plus the background color they are drawn over.
///
/// Insertion order is draw order. The selection is an index into `shapes`
/// and never owns the shape.
#[derive(Debug)]
pub struct Scene {
    pub background: Color,
    shapes: Vec<Shape>,
    selected: Option<usize>,
}

impl Scene {
    pub const DEFAULT_BACKGROUND: Color = Color::new(0.24, 0.25, 0.27, 1.0);

    pub fn new() -> Self {
        Self::with_background(Self::DEFAULT_BACKGROUND)
    }

    pub fn with_background(background: Color) -> Self {
        Self {
            background,
            shapes: Vec::new(),
            selected: None,
        }
    }

    /// Appends a shape. `None` is ignored.
    pub fn add_shape(&mut self, shape: impl Into<Option<Shape>>) {
        if let Some(shape) = shape.into() {
            self.shapes.push(shape);
        }
    }

    /// Removes and returns the shape at `index`; `None` or an index past the
    /// end is ignored.
    ///
    /// A selection pointing at the removed shape is cleared, one pointing
    /// past it shifts down.
    pub fn remove_shape(&mut self, index: impl Into<Option<usize>>) -> Option<Shape> {
        let index = index.into().filter(|&index| index < self.shapes.len())?;

        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };

        Some(self.shapes.remove(index))
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Selects the shape at `index`, deselecting any previous one.
    ///
    /// Returns `false` and leaves the selection alone if there is no such
    /// shape.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.shapes.len() {
            return false;
        }
        self.clear_selection();
        self.shapes[index].selected = true;
        self.selected = Some(index);
        true
    }

    pub fn clear_selection(&mut self) {
        if let Some(shape) = self.selected.take().and_then(|i| self.shapes.get_mut(i)) {
            shape.selected = false;
        }
    }

    pub fn selected_shape(&self) -> Option<usize> {
        self.selected
    }

    /// Sets the clear color, then draws every shape with `view * model`.
    pub fn render<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: &ShaderProgram,
        view: Matrix4<f32>,
    ) -> Result<(), ShaderError> {
        backend.clear_color(self.background);

        for shape in &self.shapes {
            shape.render(backend, program, view * shape.model_matrix())?;
        }

        debug!("Rendered {} shapes", self.shapes.len());
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::DrawStyle;
    use crate::gfx::rendering::recording::{Call, RecordingBackend};
    use crate::gfx::shader::{ShaderInterface, ShaderSources, MODELVIEW_UNIFORM};
    use crate::gfx::transform::{matrix4_to_array, translation};
    use cgmath::SquareMatrix;

    fn setup() -> (RecordingBackend, ShaderProgram) {
        let mut backend = RecordingBackend::new();
        let sources = ShaderSources::new("vs", "fs");
        let program = ShaderProgram::new(&mut backend, &sources, &ShaderInterface::viewer()).unwrap();
        program.use_program(&mut backend);
        (backend, program)
    }

    fn custom_shape(backend: &mut RecordingBackend) -> Shape {
        let cube = crate::gfx::geometry::generate_cube();
        Shape::from_vertices(backend, cube.vertices, cube.indices[..12].to_vec(), DrawStyle::Static)
            .unwrap()
    }

    #[test]
    fn one_draw_per_shape_sized_by_indices() {
        let (mut backend, program) = setup();
        let mut scene = Scene::new();
        scene.add_shape(custom_shape(&mut backend));
        backend.clear_calls();

        scene
            .render(&mut backend, &program, translation(0.0, 0.0, -1.0))
            .unwrap();

        let draws = backend.draws();
        assert_eq!(draws.len(), scene.shape_count());
        assert!(matches!(draws[0], Call::Draw { index_count: 12, .. }));
    }

    #[test]
    fn clears_with_background_first() {
        let (mut backend, program) = setup();
        let scene = Scene::new();
        backend.clear_calls();
        scene.render(&mut backend, &program, Matrix4::identity()).unwrap();
        assert_eq!(backend.calls(), &[Call::Clear(Scene::DEFAULT_BACKGROUND)]);
    }

    #[test]
    fn modelview_is_view_times_model() {
        let (mut backend, program) = setup();
        let mut scene = Scene::new();
        let mut shape = custom_shape(&mut backend);
        shape.translate(1.0, 2.0, 3.0);
        shape.rotate(10.0, 20.0, 30.0);
        let model = shape.model_matrix();
        scene.add_shape(shape);

        let view = translation(0.0, 0.0, -4.0);
        scene.render(&mut backend, &program, view).unwrap();

        let location = backend.location(MODELVIEW_UNIFORM).unwrap();
        assert!(backend.calls().contains(&Call::UniformMatrix4 {
            location,
            matrix: matrix4_to_array(view * model),
        }));
    }

    #[test]
    fn duplicates_and_order_are_kept() {
        let (mut backend, program) = setup();
        let mut scene = Scene::new();
        scene.add_shape(Shape::cube(&mut backend).unwrap());
        scene.add_shape(Shape::triangle(&mut backend, None).unwrap());
        scene.add_shape(Shape::cube(&mut backend).unwrap());
        scene.add_shape(None);
        assert_eq!(scene.shape_count(), 3);

        backend.clear_calls();
        scene.render(&mut backend, &program, Matrix4::identity()).unwrap();
        let counts: Vec<u32> = backend
            .draws()
            .into_iter()
            .filter_map(|call| match call {
                Call::Draw { index_count, .. } => Some(*index_count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![36, 3, 36]);
    }

    #[test]
    fn selection_follows_removal() {
        let (mut backend, _) = setup();
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene.add_shape(Shape::cube(&mut backend).unwrap());
        }

        assert!(!scene.select(5));
        assert!(scene.select(2));
        assert!(scene.shapes()[2].selected);

        scene.remove_shape(0);
        assert_eq!(scene.selected_shape(), Some(1));
        assert!(scene.shapes()[1].selected);

        scene.remove_shape(1);
        assert_eq!(scene.selected_shape(), None);
        assert!(scene.remove_shape(None).is_none());
        assert!(scene.remove_shape(9).is_none());
        assert_eq!(scene.shape_count(), 1);
    }

    #[test]
    fn selected_shape_is_flagged_in_uniforms() {
        let (mut backend, program) = setup();
        let mut scene = Scene::new();
        scene.add_shape(Shape::cube(&mut backend).unwrap());
        scene.add_shape(Shape::cube(&mut backend).unwrap());
        scene.select(1);
        backend.clear_calls();

        scene.render(&mut backend, &program, Matrix4::identity()).unwrap();

        let selected = backend.location(crate::gfx::shader::SELECTED_UNIFORM).unwrap();
        let flags: Vec<_> = backend
            .calls()
            .iter()
            .filter_map(|call| match call {
                Call::UniformI { location, values } if *location == selected => Some(values[0]),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![0, 1]);

        scene.clear_selection();
        assert!(scene.shapes().iter().all(|shape| !shape.selected));
    }
}
