use std::fs;
use std::path::Path;

use log::{debug, trace};

use super::{ShaderInterface, ShaderSources, ShaderStage, UniformValue};
use crate::error::ShaderError;
use crate::gfx::rendering::backend::{AttribLocation, GraphicsBackend, ProgramId, UniformLocation};
use crate::gfx::transform::{matrix3_to_array, matrix4_to_array};

/// A linked vertex + fragment program.
///
/// Holds only the backend handle. Uniform and attribute locations are looked
/// up on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    id: ProgramId,
}

impl ShaderProgram {
    /// Compiles and links both stages.
    ///
    /// Compile and link diagnostics that are not errors are logged as
    /// warnings by the backend.
    pub fn new<B: GraphicsBackend>(
        backend: &mut B,
        sources: &ShaderSources<'_>,
        interface: &ShaderInterface,
    ) -> Result<Self, ShaderError> {
        let id = backend.create_program(sources, interface)?;
        debug!("Linked shader program {:?}", id);
        Ok(Self { id })
    }

    /// Reads both stages from disk, then compiles and links them.
    pub fn from_paths<B: GraphicsBackend>(
        backend: &mut B,
        vertex_path: Option<&Path>,
        fragment_path: Option<&Path>,
        interface: &ShaderInterface,
    ) -> Result<Self, ShaderError> {
        let (Some(vertex_path), Some(fragment_path)) = (vertex_path, fragment_path) else {
            return Err(ShaderError::MissingStage);
        };

        let vertex = read_stage(ShaderStage::Vertex, vertex_path)?;
        let fragment = read_stage(ShaderStage::Fragment, fragment_path)?;
        Self::new(backend, &ShaderSources::new(vertex, fragment), interface)
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn use_program<B: GraphicsBackend>(&self, backend: &mut B) {
        backend.use_program(Some(self.id));
    }

    pub fn end_use<B: GraphicsBackend>(backend: &mut B) {
        backend.use_program(None);
    }

    pub fn uniform_location<B: GraphicsBackend>(&self, backend: &B, name: Option<&str>) -> Option<UniformLocation> {
        backend.uniform_location(self.id, name?)
    }

    pub fn attrib_location<B: GraphicsBackend>(&self, backend: &B, name: Option<&str>) -> Option<AttribLocation> {
        backend.attrib_location(self.id, name?)
    }

    /// Sets one to four integer components; any other count is ignored.
    pub fn set_uniform_i<B: GraphicsBackend>(&self, backend: &mut B, name: &str, values: &[i32]) {
        if !(1..=4).contains(&values.len()) {
            return;
        }
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_i(location, values);
        }
    }

    /// Sets one to four float components; any other count is ignored.
    pub fn set_uniform_f<B: GraphicsBackend>(&self, backend: &mut B, name: &str, values: &[f32]) {
        if !(1..=4).contains(&values.len()) {
            return;
        }
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_f(location, values);
        }
    }

    pub fn set_uniform_iv<B: GraphicsBackend>(&self, backend: &mut B, name: &str, values: &[i32]) {
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_iv(location, values);
        }
    }

    pub fn set_uniform_fv<B: GraphicsBackend>(&self, backend: &mut B, name: &str, values: &[f32]) {
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_fv(location, values);
        }
    }

    pub fn set_uniform_matrix3<B: GraphicsBackend>(&self, backend: &mut B, name: &str, matrix: cgmath::Matrix3<f32>) {
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_matrix3(location, &matrix3_to_array(matrix));
        }
    }

    pub fn set_uniform_matrix4<B: GraphicsBackend>(&self, backend: &mut B, name: &str, matrix: cgmath::Matrix4<f32>) {
        if let Some(location) = self.uniform_location(backend, Some(name)) {
            backend.uniform_matrix4(location, &matrix4_to_array(matrix));
        }
    }

    /// Writes `value` to the uniform called `name`.
    ///
    /// A name that is a vertex attribute is accepted and ignored. A name that
    /// is neither returns [`ShaderError::UnknownName`].
    pub fn set<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaderError> {
        self.set_optional(backend, Some(name), Some(value.into()))
    }

    /// Like [`set`](Self::set), but a missing name or value is a no-op.
    pub fn set_optional<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        name: Option<&str>,
        value: Option<UniformValue>,
    ) -> Result<(), ShaderError> {
        let (Some(name), Some(value)) = (name, value) else {
            return Ok(());
        };

        if self.uniform_location(backend, Some(name)).is_some() {
            self.dispatch(backend, name, value);
            return Ok(());
        }

        if self.attrib_location(backend, Some(name)).is_some() {
            trace!("'{}' is a vertex attribute, ignoring value", name);
            return Ok(());
        }

        Err(ShaderError::UnknownName(name.to_string()))
    }

    fn dispatch<B: GraphicsBackend>(&self, backend: &mut B, name: &str, value: UniformValue) {
        match value {
            UniformValue::Matrix4(matrix) => self.set_uniform_matrix4(backend, name, matrix),
            UniformValue::Matrix3(matrix) => self.set_uniform_matrix3(backend, name, matrix),
            UniformValue::FloatVector(values) if !values.is_empty() => {
                self.set_uniform_fv(backend, name, &values)
            }
            // An empty list has no float first element, so it takes the integer path.
            UniformValue::FloatVector(_) => self.set_uniform_iv(backend, name, &[]),
            UniformValue::IntVector(values) => self.set_uniform_iv(backend, name, &values),
            UniformValue::Int(value) => self.set_uniform_i(backend, name, &[value]),
            UniformValue::Float(value) => self.set_uniform_f(backend, name, &[value]),
        }
    }
}

fn read_stage(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    })
}
