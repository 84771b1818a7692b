//! Error types for the viewer.
//!
//! Each subsystem reports its own failures; [`ViewerError`] aggregates them for
//! callers that drive the whole frame loop.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::shader::ShaderStage;

/// Failures while creating primitive geometry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("shape vertices and indices cannot be empty")]
    MissingData,
    #[error("vertex data length {len} is not a multiple of the {stride}-float vertex stride")]
    Stride { len: usize, stride: usize },
    #[error("index {index} references vertex outside of the {vertex_count} uploaded vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("draw style '{0}' is invalid")]
    InvalidDrawStyle(String),
    #[error("vertex array {0} does not exist")]
    UnknownVertexArray(u32),
}

/// Failures while building or driving a shader program.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("vertex or fragment shader source location is missing")]
    MissingStage,
    #[error("failed to read {stage} shader '{path}'")]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader: {message}")]
    Compile { stage: ShaderStage, message: String },
    #[error("failed to link shader program: {0}")]
    Link(String),
    #[error("attempting to set '{0}', which is not in the shader")]
    UnknownName(String),
    #[error("shader program {0} does not exist")]
    UnknownProgram(u32),
}

/// Failures raised while mapping raw input onto the camera.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("mouse button {button} not supported (max {max})")]
    MouseButtonOutOfRange { button: u32, max: usize },
    #[error("camera index {index} out of range ({count} cameras)")]
    CameraOutOfRange { index: usize, count: usize },
}

/// Failures from the wgpu render engine.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create render surface")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to request a graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request a graphics device")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("the graphics device ran out of memory")]
    OutOfMemory,
}

/// Failures from color channel validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorError {
    #[error("color channel value {0} is not a finite number")]
    NonFinite(f32),
    #[error("index {index} out of bounds on color with {channels} channels")]
    IndexOutOfBounds { index: usize, channels: usize },
}

/// Top-level viewer failure.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("width and height should be greater than 0 (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("viewer needs to have a title")]
    MissingTitle,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Interaction(#[from] InteractionError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
