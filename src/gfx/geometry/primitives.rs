//! # Primitive Shape Generation
//!
//! Built-in vertex data for the primitive shapes. Every vertex is
//! `x, y, z, r, g, b`, indices form a triangle list.

use super::GeometryData;

#[rustfmt::skip]
const CUBE_VERTICES: [f32; 48] = [
    -0.5,  0.5,  0.5,   0.0, 1.0, 0.0,
     0.5,  0.5,  0.5,   0.0, 1.0, 0.0,
    -0.5, -0.5,  0.5,   0.0, 1.0, 0.0,
     0.5, -0.5,  0.5,   0.0, 1.0, 0.0,
    -0.5,  0.5, -0.5,   1.0, 0.0, 0.0,
     0.5,  0.5, -0.5,   1.0, 0.0, 0.0,
    -0.5, -0.5, -0.5,   1.0, 0.0, 0.0,
     0.5, -0.5, -0.5,   1.0, 0.0, 0.0,
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    0, 1, 3,  0, 2, 3, // front
    1, 7, 3,  1, 5, 7, // right
    4, 2, 0,  4, 6, 2, // left
    4, 6, 5,  5, 6, 7, // back
    0, 4, 5,  0, 1, 5, // top
    2, 6, 7,  2, 7, 3, // bottom
];

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 24] = [
     0.5,  0.5, 0.0,   0.0, 0.0, 0.0,
     0.5, -0.5, 0.0,   0.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 0.0, 0.0,
    -0.5,  0.5, 0.0,   0.0, 0.0, 0.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

#[rustfmt::skip]
const TRIANGLE_VERTICES: [f32; 18] = [
     0.5, -0.5, 0.0,   0.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 0.0, 0.0,
     0.0,  0.5, 0.0,   0.0, 0.0, 0.0,
];

const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// Unit cube centered at the origin.
///
/// The `+z` half is green, the `-z` half red.
pub fn generate_cube() -> GeometryData {
    GeometryData::new(CUBE_VERTICES.to_vec(), CUBE_INDICES.to_vec())
}

/// Unit quad in the XY plane, two triangles.
pub fn generate_quad() -> GeometryData {
    GeometryData::new(QUAD_VERTICES.to_vec(), QUAD_INDICES.to_vec())
}

/// Single triangle in the XY plane pointing up.
pub fn generate_triangle() -> GeometryData {
    GeometryData::new(TRIANGLE_VERTICES.to_vec(), TRIANGLE_INDICES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_shapes_are_valid() {
        for (data, vertices, indices) in [
            (generate_cube(), 8, 36),
            (generate_quad(), 4, 6),
            (generate_triangle(), 3, 3),
        ] {
            assert!(data.validate().is_ok());
            assert_eq!(data.vertex_count(), vertices);
            assert_eq!(data.indices.len(), indices);
        }
    }

    #[test]
    fn cube_faces_are_colored_by_depth() {
        let cube = generate_cube();
        for vertex in cube.vertices.chunks_exact(6) {
            let expected = if vertex[2] > 0.0 { [0.0, 1.0, 0.0] } else { [1.0, 0.0, 0.0] };
            assert_eq!(&vertex[3..], &expected);
        }
        assert_eq!(cube.triangle_count(), 12);
    }
}
