// src/wgpu_utils/binding_types.rs
//! WGPU binding type utilities

/// Uniform buffer bound with a per-draw dynamic offset.
pub fn uniform_dynamic(block_size: u64) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: true,
        min_binding_size: wgpu::BufferSize::new(block_size),
    }
}
