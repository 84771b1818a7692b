//! WGPU-based rendering engine for the viewer
//!
//! Implements [`GraphicsBackend`] on top of wgpu. Draw calls issued during a
//! frame are recorded together with a snapshot of the current program's
//! uniforms and replayed in one render pass at [`end_frame`].
//!
//! [`end_frame`]: GraphicsBackend::end_frame

use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use super::backend::{AttribLocation, GraphicsBackend, ProgramId, UniformLocation, VertexArrayId};
use super::pipeline::GpuProgram;
use super::texture_resource::TextureResource;
use crate::error::{GeometryError, RenderError, ShaderError};
use crate::gfx::color::Color;
use crate::gfx::geometry::DrawStyle;
use crate::gfx::shader::{ShaderInterface, ShaderSources, UniformBlock, UniformTypeMismatch};

struct GpuVertexArray {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

struct DrawCommand {
    program: usize,
    vertex_array: usize,
    index_count: u32,
    uniform_offset: u32,
}

/// Core rendering engine managing the surface, GPU resources and draw calls.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    programs: Vec<GpuProgram>,
    vertex_arrays: Vec<GpuVertexArray>,
    current_program: Option<ProgramId>,
    clear_color: wgpu::Color,
    commands: Vec<DrawCommand>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window.
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be obtained.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8Unorm);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            programs: Vec::new(),
            vertex_arrays: Vec::new(),
            current_program: None,
            clear_color: Color::BLACK.into(),
            commands: Vec::new(),
        })
    }

    /// Reconfigures the surface and recreates the depth buffer.
    ///
    /// Zero-sized requests (a minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    fn write_uniform(
        &mut self,
        location: UniformLocation,
        write: impl FnOnce(&mut UniformBlock) -> Result<(), UniformTypeMismatch>,
    ) {
        let Some(program) = self.programs.get_mut(location.program.raw() as usize) else {
            warn!("Uniform write to unknown program {}", location.program.raw());
            return;
        };
        if let Err(mismatch) = write(&mut program.block) {
            warn!("Ignoring uniform write: {}", mismatch);
        }
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next surface texture");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(error) => {
                warn!("Skipping frame: {}", error);
                Ok(None)
            }
        }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

impl GraphicsBackend for RenderEngine {
    fn create_vertex_array(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
        _layout: &wgpu::VertexBufferLayout<'static>,
        style: DrawStyle,
    ) -> Result<VertexArrayId, GeometryError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(GeometryError::MissingData);
        }

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: style.buffer_usages(wgpu::BufferUsages::VERTEX),
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: style.buffer_usages(wgpu::BufferUsages::INDEX),
            });

        let id = VertexArrayId(self.vertex_arrays.len() as u32);
        self.vertex_arrays.push(GpuVertexArray {
            vertex_buffer,
            index_buffer,
        });
        Ok(id)
    }

    fn create_program(
        &mut self,
        sources: &ShaderSources<'_>,
        interface: &ShaderInterface,
    ) -> Result<ProgramId, ShaderError> {
        let program = GpuProgram::link(&self.device, self.format, sources, interface)?;
        let id = ProgramId(self.programs.len() as u32);
        self.programs.push(program);
        Ok(id)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let index = self
            .programs
            .get(program.raw() as usize)?
            .interface
            .uniform_index(name)?;
        Some(UniformLocation { program, index })
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs
            .get(program.raw() as usize)?
            .interface
            .attribute_location(name)
            .map(AttribLocation)
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, matrix: &[[f32; 4]; 4]) {
        self.write_uniform(location, |block| block.write_matrix4(location.index, matrix));
    }

    fn uniform_matrix3(&mut self, location: UniformLocation, matrix: &[[f32; 3]; 3]) {
        self.write_uniform(location, |block| block.write_matrix3(location.index, matrix));
    }

    fn uniform_fv(&mut self, location: UniformLocation, values: &[f32]) {
        self.write_uniform(location, |block| block.write_floats(location.index, values));
    }

    fn uniform_iv(&mut self, location: UniformLocation, values: &[i32]) {
        self.write_uniform(location, |block| block.write_ints(location.index, values));
    }

    fn uniform_f(&mut self, location: UniformLocation, values: &[f32]) {
        self.write_uniform(location, |block| block.write_floats(location.index, values));
    }

    fn uniform_i(&mut self, location: UniformLocation, values: &[i32]) {
        self.write_uniform(location, |block| block.write_ints(location.index, values));
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        if (width, height) != self.surface_size() {
            self.resize(width, height);
        }
    }

    fn clear_color(&mut self, color: Color) {
        self.clear_color = color.into();
    }

    fn draw_elements(&mut self, vertex_array: VertexArrayId, index_count: u32) {
        let Some(program_id) = self.current_program else {
            warn!("Draw of vertex array {} without a program", vertex_array.raw());
            return;
        };
        let program_index = program_id.raw() as usize;
        let Some(program) = self.programs.get_mut(program_index) else {
            return;
        };
        if vertex_array.raw() as usize >= self.vertex_arrays.len() {
            warn!("Draw of unknown vertex array {}", vertex_array.raw());
            return;
        }

        let uniform_offset = program.ring.push(program.block.bytes());
        self.commands.push(DrawCommand {
            program: program_index,
            vertex_array: vertex_array.raw() as usize,
            index_count,
            uniform_offset,
        });
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        for program in &mut self.programs {
            program.ring.reset();
        }
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let Some(frame) = self.acquire_frame()? else {
            self.commands.clear();
            return Ok(());
        };

        for program in &mut self.programs {
            program.flush(&self.device, &self.queue);
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for command in &self.commands {
                let program = &self.programs[command.program];
                let vertex_array = &self.vertex_arrays[command.vertex_array];

                render_pass.set_pipeline(&program.pipeline);
                render_pass.set_bind_group(0, &program.bind_group, &[command.uniform_offset]);
                render_pass.set_vertex_buffer(0, vertex_array.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(vertex_array.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..command.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.commands.clear();
        Ok(())
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        debug!(
            "Releasing {} vertex arrays and {} programs",
            self.vertex_arrays.len(),
            self.programs.len()
        );
        for vertex_array in &self.vertex_arrays {
            vertex_array.vertex_buffer.destroy();
            vertex_array.index_buffer.destroy();
        }
        for program in &self.programs {
            program.ring.buffer().destroy();
        }
    }
}
