//! # Vertex Data Structures
//!
//! Interleaved position + color vertex used by every primitive shape.

/// A vertex with position and color.
///
/// Six `f32`s, 24 bytes: `x, y, z, r, g, b`. Primitive geometry is supplied
/// as a flat `f32` slice in exactly this order.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    /// Floats per vertex.
    pub const STRIDE: usize = 6;

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Attribute 0 is the position at offset 0, attribute 1 the color at
    /// offset 12, both `Float32x3` with a 24 byte stride.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
