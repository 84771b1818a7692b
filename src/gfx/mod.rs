//! # Graphics Module
//!
//! Everything that ends up on screen: shapes and their transforms, the
//! trackball camera, shader programs, and the backend that talks to the GPU.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Camera offset plus trackball orientation
//! - **Geometry** ([`geometry`]) - Vertex/index buffers of primitive shapes
//! - **Rendering** ([`rendering`]) - The [`GraphicsBackend`] seam and its wgpu implementation
//! - **Scene Management** ([`scene`]) - Shape hierarchy and the ordered scene
//! - **Shaders** ([`shader`]) - Program linking and by-name uniform dispatch
//!
//! ## Usage
//!
//! ```no_run
//! use modelplane::gfx::{scene::{Scene, Shape}, RenderEngine};
//!
//! // The render engine is created by ModelplaneApp once the window exists
//! // let mut engine = RenderEngine::new(window, width, height, true).await?;
//! // let mut scene = Scene::new();
//! // scene.add_shape(Shape::cube(&mut engine)?);
//! ```
//!
//! [`GraphicsBackend`]: rendering::GraphicsBackend

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod scene;
pub mod shader;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, Trackball};
pub use color::Color;
pub use rendering::render_engine::RenderEngine;
pub use scene::{Scene, Shape};
pub use shader::ShaderProgram;
