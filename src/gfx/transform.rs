//! Homogeneous transform builders shared by shapes, the camera and the viewer.
//!
//! All matrices are cgmath column-major `Matrix4<f32>` and every product in
//! this crate is written in the order it is applied by `*`, left operand
//! first. Callers must not reorder them.

use cgmath::{Deg, Matrix3, Matrix4, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Value accepted by [`Shape::scale`](crate::gfx::scene::Shape::scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// A fully formed scale matrix, used as is.
    Matrix(Matrix4<f32>),
    Uniform(f32),
    PerAxis(Vector3<f32>),
}

impl Scale {
    pub fn to_matrix(self) -> Matrix4<f32> {
        match self {
            Scale::Matrix(matrix) => matrix,
            Scale::Uniform(value) => Matrix4::from_scale(value),
            Scale::PerAxis(v) => Matrix4::from_nonuniform_scale(v.x, v.y, v.z),
        }
    }
}

impl From<f32> for Scale {
    fn from(value: f32) -> Self {
        Scale::Uniform(value)
    }
}

impl From<Vector3<f32>> for Scale {
    fn from(value: Vector3<f32>) -> Self {
        Scale::PerAxis(value)
    }
}

impl From<[f32; 3]> for Scale {
    fn from(value: [f32; 3]) -> Self {
        Scale::PerAxis(value.into())
    }
}

impl From<Matrix4<f32>> for Scale {
    fn from(value: Matrix4<f32>) -> Self {
        Scale::Matrix(value)
    }
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

/// `Rx * Ry * Rz` from angles in degrees.
pub fn rotation_xyz(x_deg: f32, y_deg: f32, z_deg: f32) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(x_deg)) * Matrix4::from_angle_y(Deg(y_deg)) * Matrix4::from_angle_z(Deg(z_deg))
}

/// Perspective projection remapped to wgpu's `0..1` clip depth.
pub fn perspective(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(fov_deg), aspect, near, far)
}

pub fn matrix4_to_array(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}

pub fn matrix3_to_array(matrix: Matrix3<f32>) -> [[f32; 3]; 3] {
    matrix.into()
}
