//! # Scene Management Module
//!
//! Shapes, their transforms, and the ordered scene that draws them.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered shapes plus background color; one pass per frame
//! - [`Shape`] - Primitive geometry or a container of child shapes
//! - [`ColorVertex`] - Interleaved position + color vertex layout
//!
//! ## Usage
//!
//! ```no_run
//! use modelplane::gfx::scene::{Scene, Shape};
//! # fn demo(backend: &mut impl modelplane::gfx::rendering::GraphicsBackend) -> Result<(), modelplane::error::GeometryError> {
//! let mut cube = Shape::cube(backend)?;
//! cube.translate(0.0, 0.5, 0.0);
//!
//! let mut scene = Scene::new();
//! scene.add_shape(cube);
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
pub mod scene;
pub mod shape;
pub mod vertex;

// Re-export main types
pub use scene::Scene;
pub use shape::{Shape, ShapeKind};
pub use vertex::ColorVertex;
