//! In-memory backend that records every call, for tests without a GPU.

use super::backend::{AttribLocation, GraphicsBackend, ProgramId, UniformLocation, VertexArrayId};
use crate::error::{GeometryError, RenderError, ShaderError};
use crate::gfx::color::Color;
use crate::gfx::geometry::DrawStyle;
use crate::gfx::shader::{ProgramInterface, ShaderInterface, ShaderSources, ShaderStage, UniformBlock};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVertexArray {
        id: VertexArrayId,
        vertex_count: usize,
        index_count: usize,
        stride: u64,
        style: DrawStyle,
    },
    CreateProgram(ProgramId),
    UniformMatrix4 {
        location: UniformLocation,
        matrix: [[f32; 4]; 4],
    },
    UniformMatrix3 {
        location: UniformLocation,
        matrix: [[f32; 3]; 3],
    },
    UniformFv {
        location: UniformLocation,
        values: Vec<f32>,
    },
    UniformIv {
        location: UniformLocation,
        values: Vec<i32>,
    },
    UniformF {
        location: UniformLocation,
        values: Vec<f32>,
    },
    UniformI {
        location: UniformLocation,
        values: Vec<i32>,
    },
    UseProgram(Option<ProgramId>),
    Viewport(u32, u32),
    Clear(Color),
    Draw {
        vertex_array: VertexArrayId,
        index_count: u32,
        program: Option<ProgramId>,
        uniforms: Vec<u8>,
    },
    BeginFrame,
    EndFrame,
}

struct RecordedProgram {
    interface: ProgramInterface,
    block: UniformBlock,
}

#[derive(Default)]
pub struct RecordingBackend {
    calls: Vec<Call>,
    programs: Vec<RecordedProgram>,
    vertex_arrays: u32,
    current: Option<ProgramId>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn draws(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Draw { .. }))
            .collect()
    }

    /// Location of `name` in the most recently linked program.
    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        let program = ProgramId(self.programs.len().checked_sub(1)? as u32);
        self.uniform_location(program, name)
    }

    /// Current uniform bytes of `program`.
    pub fn uniform_bytes(&self, program: ProgramId) -> &[u8] {
        self.programs[program.0 as usize].block.bytes()
    }

    fn block(&mut self, location: UniformLocation) -> Option<&mut UniformBlock> {
        self.programs
            .get_mut(location.program.0 as usize)
            .map(|program| &mut program.block)
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_vertex_array(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        layout: &wgpu::VertexBufferLayout<'static>,
        style: DrawStyle,
    ) -> Result<VertexArrayId, GeometryError> {
        let id = VertexArrayId(self.vertex_arrays);
        self.vertex_arrays += 1;
        self.calls.push(Call::CreateVertexArray {
            id,
            vertex_count: vertices.len() * 4 / layout.array_stride as usize,
            index_count: indices.len(),
            stride: layout.array_stride,
            style,
        });
        Ok(id)
    }

    fn create_program(
        &mut self,
        sources: &ShaderSources<'_>,
        interface: &ShaderInterface,
    ) -> Result<ProgramId, ShaderError> {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if sources.get(stage).trim().is_empty() {
                return Err(ShaderError::Compile {
                    stage,
                    message: "empty shader source".into(),
                });
            }
        }

        let interface = ProgramInterface::new(interface);
        let block = UniformBlock::new(interface.layout().clone());
        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(RecordedProgram { interface, block });
        self.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let index = self.programs.get(program.0 as usize)?.interface.uniform_index(name)?;
        Some(UniformLocation { program, index })
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs
            .get(program.0 as usize)?
            .interface
            .attribute_location(name)
            .map(AttribLocation)
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, matrix: &[[f32; 4]; 4]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_matrix4(location.index, matrix);
        }
        self.calls.push(Call::UniformMatrix4 {
            location,
            matrix: *matrix,
        });
    }

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &[[f32; 3]; 3]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_matrix3(location.index, matrix);
        }
        self.calls.push(Call::UniformMatrix3 {
            location,
            matrix: *matrix,
        });
    }

    fn uniform_fv(&mut self, location: UniformLocation, values: &[f32]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_floats(location.index, values);
        }
        self.calls.push(Call::UniformFv {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform_iv(&mut self, location: UniformLocation, values: &[i32]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_ints(location.index, values);
        }
        self.calls.push(Call::UniformIv {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform_f(&mut self, location: UniformLocation, values: &[f32]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_floats(location.index, values);
        }
        self.calls.push(Call::UniformF {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform_i(&mut self, location: UniformLocation, values: &[i32]) {
        if let Some(block) = self.block(location) {
            let _ = block.write_ints(location.index, values);
        }
        self.calls.push(Call::UniformI {
            location,
            values: values.to_vec(),
        });
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current = program;
        self.calls.push(Call::UseProgram(program));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn clear_color(&mut self, color: Color) {
        self.calls.push(Call::Clear(color));
    }

    fn draw_elements(&mut self, vertex_array: VertexArrayId, index_count: u32) {
        let uniforms = self
            .current
            .map(|program| self.uniform_bytes(program).to_vec())
            .unwrap_or_default();
        self.calls.push(Call::Draw {
            vertex_array,
            index_count,
            program: self.current,
            uniforms,
        });
    }

    fn begin_frame(&mut self) {
        self.calls.push(Call::BeginFrame);
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.calls.push(Call::EndFrame);
        Ok(())
    }
}
