use cgmath::{Matrix4, SquareMatrix};

use crate::error::{GeometryError, ShaderError};
use crate::gfx::color::Color;
use crate::gfx::geometry::{
    generate_cube, generate_quad, generate_triangle, Aabb, DrawStyle, GeometryData,
    PrimitiveGeometry,
};
use crate::gfx::rendering::backend::GraphicsBackend;
use crate::gfx::shader::{ShaderProgram, MODELVIEW_UNIFORM, SELECTED_UNIFORM};
use crate::gfx::transform::{rotation_xyz, translation, Scale};

/// What a shape draws.
#[derive(Debug)]
pub enum ShapeKind {
    /// Owns one vertex/index buffer pair.
    Primitive(PrimitiveGeometry),
    /// Draws its children in insertion order, has no geometry of its own.
    Hierarchical(Vec<Shape>),
}

/// A renderable with independently settable scale, rotation and translation.
///
/// The model matrix is always `scale * rotation * translation`. Each setter
/// replaces its own matrix; nothing accumulates.
#[derive(Debug)]
pub struct Shape {
    pub color: Color,
    pub selected: bool,
    translation: Matrix4<f32>,
    rotation: Matrix4<f32>,
    scale: Matrix4<f32>,
    kind: ShapeKind,
}

impl Shape {
    fn with_kind(kind: ShapeKind) -> Self {
        Self {
            color: Color::BLACK,
            selected: false,
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            scale: Matrix4::identity(),
            kind,
        }
    }

    pub fn primitive(geometry: PrimitiveGeometry) -> Self {
        Self::with_kind(ShapeKind::Primitive(geometry))
    }

    /// Uploads `vertices` (`x, y, z, r, g, b` per vertex) and `indices`.
    pub fn from_vertices<B: GraphicsBackend>(
        backend: &mut B,
        vertices: Vec<f32>,
        indices: Vec<u32>,
        style: DrawStyle,
    ) -> Result<Self, GeometryError> {
        PrimitiveGeometry::new(backend, vertices, indices, style).map(Self::primitive)
    }

    pub fn hierarchical() -> Self {
        Self::with_kind(ShapeKind::Hierarchical(Vec::new()))
    }

    pub fn cube<B: GraphicsBackend>(backend: &mut B) -> Result<Self, GeometryError> {
        PrimitiveGeometry::from_data(backend, generate_cube(), DrawStyle::Dynamic).map(Self::primitive)
    }

    /// Quad with the built-in vertex data unless `data` is given.
    pub fn quad<B: GraphicsBackend>(
        backend: &mut B,
        data: Option<GeometryData>,
    ) -> Result<Self, GeometryError> {
        let data = data.unwrap_or_else(generate_quad);
        PrimitiveGeometry::from_data(backend, data, DrawStyle::Dynamic).map(Self::primitive)
    }

    /// Triangle with the built-in vertex data unless `data` is given.
    pub fn triangle<B: GraphicsBackend>(
        backend: &mut B,
        data: Option<GeometryData>,
    ) -> Result<Self, GeometryError> {
        let data = data.unwrap_or_else(generate_triangle);
        PrimitiveGeometry::from_data(backend, data, DrawStyle::Dynamic).map(Self::primitive)
    }

    /// Places the shape at `(x, y, z)`, discarding the previous translation.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.translation = translation(x, y, z);
    }

    /// Sets the rotation to `Rx * Ry * Rz`, angles in degrees.
    pub fn rotate(&mut self, x_deg: f32, y_deg: f32, z_deg: f32) {
        self.rotation = rotation_xyz(x_deg, y_deg, z_deg);
    }

    /// Accepts a full scale matrix, a uniform factor, or per-axis factors.
    pub fn scale(&mut self, scale: impl Into<Scale>) {
        self.scale = scale.into().to_matrix();
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.scale * self.rotation * self.translation
    }

    pub fn translation_matrix(&self) -> Matrix4<f32> {
        self.translation
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        self.rotation
    }

    pub fn scale_matrix(&self) -> Matrix4<f32> {
        self.scale
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Untransformed bounds of the geometry.
    ///
    /// A container reports the union of its children, or a half-unit box when
    /// it is empty.
    pub fn bounds(&self) -> Aabb {
        match &self.kind {
            ShapeKind::Primitive(geometry) => geometry.bounds(),
            ShapeKind::Hierarchical(children) => children
                .iter()
                .map(Shape::bounds)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_else(|| {
                    Aabb::new(cgmath::Vector3::new(0.0, 0.0, 0.0), cgmath::Vector3::new(0.5, 0.5, 0.5))
                }),
        }
    }

    pub fn children(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::Hierarchical(children) => children,
            ShapeKind::Primitive(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Shape>> {
        match &mut self.kind {
            ShapeKind::Hierarchical(children) => Some(children),
            ShapeKind::Primitive(_) => None,
        }
    }

    /// Appends a child. `None`, or a primitive parent, is a no-op.
    pub fn add_child(&mut self, child: impl Into<Option<Shape>>) {
        if let (Some(child), Some(children)) = (child.into(), self.children_mut()) {
            children.push(child);
        }
    }

    /// Removes and returns the child at `index`, if there is one.
    pub fn remove_child(&mut self, index: impl Into<Option<usize>>) -> Option<Shape> {
        let index = index.into()?;
        let children = self.children_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Draws the shape with `modelview` already composed from its parent.
    ///
    /// Children are drawn with `modelview * child.model_matrix()`.
    pub fn render<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: &ShaderProgram,
        modelview: Matrix4<f32>,
    ) -> Result<(), ShaderError> {
        program.set(backend, MODELVIEW_UNIFORM, modelview)?;
        if program.uniform_location(backend, Some(SELECTED_UNIFORM)).is_some() {
            program.set(backend, SELECTED_UNIFORM, self.selected)?;
        }

        match &self.kind {
            ShapeKind::Primitive(geometry) => geometry.render(backend),
            ShapeKind::Hierarchical(children) => {
                for child in children {
                    child.render(backend, program, modelview * child.model_matrix())?;
                }
            }
        }
        Ok(())
    }
}
