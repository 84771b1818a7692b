//! Shader stage compilation and program linking on wgpu.
//!
//! A "program" is a render pipeline built from a vertex and a fragment
//! module, with a single bind group holding the program's uniform block at a
//! dynamic offset.

use log::{info, warn};
use wgpu::{
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, CompareFunction, DepthBiasState,
    DepthStencilState, FragmentState, FrontFace, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology,
    RenderPipelineDescriptor, ShaderStages, StencilState, VertexState,
};

use crate::error::ShaderError;
use crate::gfx::rendering::texture_resource::TextureResource;
use crate::gfx::shader::{ProgramInterface, ShaderInterface, ShaderSources, ShaderStage, UniformBlock};
use crate::wgpu_utils::{uniform_dynamic, UniformRing};

/// GPU side of a linked shader program.
pub struct GpuProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    pub interface: ProgramInterface,
    pub block: UniformBlock,
    pub ring: UniformRing,
}

impl GpuProgram {
    /// Compiles both stages and links them into a render pipeline.
    ///
    /// The stage modules are dropped as soon as the pipeline exists.
    pub fn link(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sources: &ShaderSources<'_>,
        interface: &ShaderInterface,
    ) -> Result<Self, ShaderError> {
        let vertex_module = compile_stage(device, ShaderStage::Vertex, sources)?;
        let fragment_module = compile_stage(device, ShaderStage::Fragment, sources)?;

        let program_interface = ProgramInterface::new(interface);
        let block_size = program_interface.layout().size() as u64;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Program Uniforms Layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: uniform_dynamic(block_size),
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Program Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Program Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[interface.vertex_layout.clone()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link(error.to_string()));
        }

        let ring = UniformRing::new(device, block_size, "program uniforms");
        let bind_group = create_bind_group(device, &bind_group_layout, &ring);

        info!(
            "Linked program with {} uniforms ({} bytes)",
            program_interface.layout().slots().len(),
            block_size
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            block: UniformBlock::new(program_interface.layout().clone()),
            interface: program_interface,
            ring,
        })
    }

    /// Uploads this frame's uniform snapshots, rebuilding the bind group if
    /// the ring had to grow.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.ring.flush(device, queue) {
            self.bind_group = create_bind_group(device, &self.bind_group_layout, &self.ring);
        }
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    ring: &UniformRing,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Program Uniforms"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: ring.binding_resource(),
        }],
    })
}

fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    sources: &ShaderSources<'_>,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "Vertex Stage",
            ShaderStage::Fragment => "Fragment Stage",
        }),
        source: wgpu::ShaderSource::Wgsl(sources.get(stage).into()),
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage,
            message: error.to_string(),
        });
    }

    let compilation = pollster::block_on(module.get_compilation_info());
    for message in compilation.messages {
        let is_error = matches!(message.message_type, wgpu::CompilationMessageType::Error);
        if !is_error && !message.message.is_empty() {
            warn!("{} shader: {}", stage, message.message);
        }
    }

    Ok(module)
}
