// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The [`GraphicsBackend`] trait is the handle-based API shapes and shader
//! programs talk to; [`RenderEngine`] implements it on wgpu.

pub mod backend;
pub mod pipeline;
pub mod render_engine;
pub mod texture_resource;

#[cfg(test)]
pub mod recording;

// Re-export main types
pub use backend::{AttribLocation, GraphicsBackend, ProgramId, UniformLocation, VertexArrayId};
pub use render_engine::RenderEngine;
