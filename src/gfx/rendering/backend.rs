//! Handle-based graphics API the scene renders through.
//!
//! Resources are referenced by small copyable ids owned by the backend, and
//! uniform uploads are typed calls against a resolved location. The wgpu
//! [`RenderEngine`](super::RenderEngine) implements it for real frames.

use crate::error::{GeometryError, RenderError, ShaderError};
use crate::gfx::color::Color;
use crate::gfx::geometry::DrawStyle;
use crate::gfx::shader::{ShaderInterface, ShaderSources};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub(crate) u32);

impl VertexArrayId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl ProgramId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Resolved uniform of a specific program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub program: ProgramId,
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

pub trait GraphicsBackend {
    /// Uploads interleaved vertices and triangle-list indices once.
    ///
    /// The data has already been validated against `layout`.
    fn create_vertex_array(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        layout: &wgpu::VertexBufferLayout<'static>,
        style: DrawStyle,
    ) -> Result<VertexArrayId, GeometryError>;

    fn create_program(
        &mut self,
        sources: &ShaderSources<'_>,
        interface: &ShaderInterface,
    ) -> Result<ProgramId, ShaderError>;

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation>;

    fn uniform_matrix4(&mut self, location: UniformLocation, matrix: &[[f32; 4]; 4]);

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &[[f32; 3]; 3]);

    fn uniform_fv(&mut self, location: UniformLocation, values: &[f32]);

    fn uniform_iv(&mut self, location: UniformLocation, values: &[i32]);

    /// One to four float components.
    fn uniform_f(&mut self, location: UniformLocation, values: &[f32]);

    /// One to four integer components.
    fn uniform_i(&mut self, location: UniformLocation, values: &[i32]);

    fn use_program(&mut self, program: Option<ProgramId>);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn clear_color(&mut self, color: Color);

    /// Draws `index_count` indices of `vertex_array` as a triangle list with
    /// the current program and its current uniform values.
    fn draw_elements(&mut self, vertex_array: VertexArrayId, index_count: u32);

    fn begin_frame(&mut self);

    fn end_frame(&mut self) -> Result<(), RenderError>;
}
