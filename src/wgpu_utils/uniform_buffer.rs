// src/wgpu_utils/uniform_buffer.rs - Dynamic-offset uniform ring
use log::debug;

use crate::gfx::shader::uniform::align_to;

/// Uniform buffer holding one snapshot of a uniform block per draw call.
///
/// Snapshots are staged on the CPU during a frame and written with a single
/// `write_buffer` before the render pass is encoded. Each draw binds its own
/// snapshot through a dynamic offset.
pub struct UniformRing {
    buffer: wgpu::Buffer,
    block_size: u64,
    stride: u64,
    capacity: u64,
    staged: Vec<u8>,
    previous_content: Vec<u8>,
    label: String,
}

impl UniformRing {
    const INITIAL_CAPACITY: u64 = 16;

    pub fn new(device: &wgpu::Device, block_size: u64, label: &str) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_to(block_size.max(16) as u32, alignment) as u64;
        let capacity = Self::INITIAL_CAPACITY;

        UniformRing {
            buffer: Self::create_buffer(device, stride * capacity, label),
            block_size,
            stride,
            capacity,
            staged: Vec::new(),
            previous_content: Vec::new(),
            label: label.to_string(),
        }
    }

    fn create_buffer(device: &wgpu::Device, size: u64, label: &str) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformRing: {label}")),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Drops all snapshots staged for the previous frame.
    pub fn reset(&mut self) {
        self.staged.clear();
    }

    /// Stages a copy of `block` and returns its dynamic offset.
    pub fn push(&mut self, block: &[u8]) -> u32 {
        let offset = self.staged.len();
        self.staged.extend_from_slice(block);
        self.staged.resize(offset + self.stride as usize, 0);
        offset as u32
    }

    pub fn len(&self) -> u64 {
        self.staged.len() as u64 / self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Uploads the staged snapshots.
    ///
    /// Returns `true` when the buffer had to be reallocated, in which case
    /// bind groups referencing it must be recreated.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let mut grew = false;
        let needed = self.len();
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::create_buffer(device, self.stride * self.capacity, &self.label);
            self.previous_content.clear();
            grew = true;
            debug!("Grew uniform ring '{}' to {} slots", self.label, self.capacity);
        }

        if self.staged.is_empty() || self.previous_content == self.staged {
            return grew;
        }

        queue.write_buffer(&self.buffer, 0, &self.staged);
        self.previous_content.clone_from(&self.staged);
        grew
    }

    /// Binding covering one snapshot; the dynamic offset selects which.
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(self.block_size),
        })
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }
}
