//! # Primitive Geometry
//!
//! Owns the GPU side of a primitive shape: one vertex array made of a vertex
//! buffer and an index buffer, uploaded once at construction and never
//! changed afterwards.
//!
//! ## Supported Primitives
//!
//! - **Cube**: 8 shared corners, 12 triangles
//! - **Quad**: 2 triangles in the XY plane
//! - **Triangle**: a single triangle in the XY plane
//!
//! ## Usage
//!
//! ```no_run
//! use modelplane::gfx::geometry::{generate_cube, DrawStyle, PrimitiveGeometry};
//! # fn demo(backend: &mut impl modelplane::gfx::rendering::GraphicsBackend) {
//! let cube = generate_cube();
//! let geometry = PrimitiveGeometry::new(backend, cube.vertices, cube.indices, DrawStyle::Static);
//! # }
//! ```

pub mod primitives;

use std::fmt;
use std::str::FromStr;

use cgmath::Vector3;
use log::debug;

pub use primitives::*;

use crate::error::GeometryError;
use crate::gfx::rendering::backend::{GraphicsBackend, VertexArrayId};
use crate::gfx::scene::vertex::ColorVertex;

/// How often buffer contents are expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawStyle {
    #[default]
    Static,
    Dynamic,
    Streaming,
}

impl DrawStyle {
    /// Buffer usages requested for a vertex or index buffer of this style.
    pub fn buffer_usages(self, base: wgpu::BufferUsages) -> wgpu::BufferUsages {
        match self {
            DrawStyle::Static => base,
            DrawStyle::Dynamic | DrawStyle::Streaming => base | wgpu::BufferUsages::COPY_DST,
        }
    }
}

impl FromStr for DrawStyle {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(DrawStyle::Static),
            "dynamic" => Ok(DrawStyle::Dynamic),
            "stream" | "streaming" => Ok(DrawStyle::Streaming),
            other => Err(GeometryError::InvalidDrawStyle(other.to_string())),
        }
    }
}

impl fmt::Display for DrawStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawStyle::Static => f.write_str("static"),
            DrawStyle::Dynamic => f.write_str("dynamic"),
            DrawStyle::Streaming => f.write_str("streaming"),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box around the positions of interleaved `ColorVertex` data.
    pub fn from_vertex_data(vertices: &[f32]) -> Self {
        let mut positions = vertices
            .chunks_exact(ColorVertex::STRIDE)
            .map(|v| Vector3::new(v[0], v[1], v[2]));

        let Some(first) = positions.next() else {
            return Self::default();
        };

        positions.fold(Self::new(first, first), |aabb, p| Self {
            min: Vector3::new(aabb.min.x.min(p.x), aabb.min.y.min(p.y), aabb.min.z.min(p.z)),
            max: Vector3::new(aabb.max.x.max(p.x), aabb.max.y.max(p.y), aabb.max.z.max(p.z)),
        })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0))
    }
}

/// Interleaved vertex data (`x, y, z, r, g, b`) and triangle-list indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / ColorVertex::STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks the data against the fixed vertex layout.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(GeometryError::MissingData);
        }

        if self.vertices.len() % ColorVertex::STRIDE != 0 {
            return Err(GeometryError::Stride {
                len: self.vertices.len(),
                stride: ColorVertex::STRIDE,
            });
        }

        let vertex_count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(())
    }
}

/// A vertex/index buffer pair plus its vertex layout, owned by one shape.
#[derive(Debug)]
pub struct PrimitiveGeometry {
    data: GeometryData,
    bounds: Aabb,
    vertex_array: VertexArrayId,
    style: DrawStyle,
}

impl PrimitiveGeometry {
    pub fn new<B: GraphicsBackend>(
        backend: &mut B,
        vertices: Vec<f32>,
        indices: Vec<u32>,
        style: DrawStyle,
    ) -> Result<Self, GeometryError> {
        Self::from_data(backend, GeometryData::new(vertices, indices), style)
    }

    pub fn from_data<B: GraphicsBackend>(
        backend: &mut B,
        data: GeometryData,
        style: DrawStyle,
    ) -> Result<Self, GeometryError> {
        data.validate()?;

        let vertex_array =
            backend.create_vertex_array(&data.vertices, &data.indices, &ColorVertex::desc(), style)?;

        debug!(
            "Created vertex array {} ({} vertices, {} indices, {})",
            vertex_array.raw(),
            data.vertex_count(),
            data.indices.len(),
            style
        );

        Ok(Self {
            bounds: Aabb::from_vertex_data(&data.vertices),
            data,
            vertex_array,
            style,
        })
    }

    /// Issues one indexed draw covering every index.
    pub fn render<B: GraphicsBackend>(&self, backend: &mut B) {
        backend.draw_elements(self.vertex_array, self.index_count());
    }

    pub fn index_count(&self) -> u32 {
        self.data.indices.len() as u32
    }

    pub fn vertices(&self) -> &[f32] {
        &self.data.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.data.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::recording::{Call, RecordingBackend};

    #[test]
    fn draw_style_parses_known_hints_only() {
        assert_eq!("static".parse::<DrawStyle>(), Ok(DrawStyle::Static));
        assert_eq!("Dynamic".parse::<DrawStyle>(), Ok(DrawStyle::Dynamic));
        assert_eq!("stream".parse::<DrawStyle>(), Ok(DrawStyle::Streaming));
        assert!(matches!(
            "sometimes".parse::<DrawStyle>(),
            Err(GeometryError::InvalidDrawStyle(_))
        ));
    }

    #[test]
    fn static_buffers_are_not_writable() {
        let base = wgpu::BufferUsages::VERTEX;
        assert_eq!(DrawStyle::Static.buffer_usages(base), base);
        assert!(DrawStyle::Dynamic
            .buffer_usages(base)
            .contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn uploads_once_with_fixed_stride() {
        let mut backend = RecordingBackend::new();
        let cube = generate_cube();
        let geometry =
            PrimitiveGeometry::from_data(&mut backend, cube, DrawStyle::Static).unwrap();

        assert_eq!(
            backend.calls(),
            &[Call::CreateVertexArray {
                id: geometry.vertex_array(),
                vertex_count: 8,
                index_count: 36,
                stride: 24,
                style: DrawStyle::Static,
            }]
        );
    }

    #[test]
    fn render_draws_every_index() {
        let mut backend = RecordingBackend::new();
        let geometry = PrimitiveGeometry::from_data(&mut backend, generate_quad(), DrawStyle::Static).unwrap();
        backend.clear_calls();

        geometry.render(&mut backend);

        assert!(matches!(
            backend.calls(),
            [Call::Draw { index_count: 6, vertex_array, .. }] if *vertex_array == geometry.vertex_array()
        ));
    }

    #[test]
    fn rejects_missing_data() {
        let mut backend = RecordingBackend::new();
        let err = PrimitiveGeometry::new(&mut backend, vec![], vec![0, 1, 2], DrawStyle::Static).unwrap_err();
        assert_eq!(err, GeometryError::MissingData);
        let err = PrimitiveGeometry::new(&mut backend, vec![0.0; 6], vec![], DrawStyle::Static).unwrap_err();
        assert_eq!(err, GeometryError::MissingData);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn rejects_partial_vertices_and_bad_indices() {
        let mut backend = RecordingBackend::new();
        let err = PrimitiveGeometry::new(&mut backend, vec![0.0; 7], vec![0], DrawStyle::Static).unwrap_err();
        assert_eq!(err, GeometryError::Stride { len: 7, stride: 6 });

        let err = PrimitiveGeometry::new(&mut backend, vec![0.0; 12], vec![0, 1, 2], DrawStyle::Static).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn bounds_cover_positions_only() {
        let aabb = Aabb::from_vertex_data(&[
            -1.0, 0.0, 2.0, 9.0, 9.0, 9.0, //
            3.0, -2.0, 0.5, -9.0, -9.0, -9.0,
        ]);
        assert_eq!(aabb.min, Vector3::new(-1.0, -2.0, 0.5));
        assert_eq!(aabb.max, Vector3::new(3.0, 0.0, 2.0));
    }
}
