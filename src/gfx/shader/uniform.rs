//! Uniform declarations, WGSL block layout and typed uniform values.
//!
//! A program's uniforms live in one WGSL struct bound at `@group(0)
//! @binding(0)`. [`UniformLayout`] mirrors the uniform address space rules so
//! values written by name land at the offsets the shader reads from.

use cgmath::{Matrix3, Matrix4, Vector2, Vector3, Vector4};
use thiserror::Error;

/// Type of a single member of the uniform struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Mat4,
    Mat3,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    /// `array<vec4<f32>, N>`; element `i` is read from `.x`.
    FloatArray(u32),
    /// `array<vec4<i32>, N>`; element `i` is read from `.x`.
    IntArray(u32),
}

impl UniformType {
    pub fn align(self) -> u32 {
        match self {
            UniformType::Float | UniformType::Int => 4,
            UniformType::Vec2 | UniformType::IVec2 => 8,
            _ => 16,
        }
    }

    pub fn size(self) -> u32 {
        match self {
            UniformType::Mat4 => 64,
            UniformType::Mat3 => 48,
            UniformType::Float | UniformType::Int => 4,
            UniformType::Vec2 | UniformType::IVec2 => 8,
            UniformType::Vec3 | UniformType::IVec3 => 12,
            UniformType::Vec4 | UniformType::IVec4 => 16,
            UniformType::FloatArray(len) | UniformType::IntArray(len) => 16 * len,
        }
    }

    fn scalar_kind(self) -> Option<ScalarKind> {
        match self {
            UniformType::Float
            | UniformType::Vec2
            | UniformType::Vec3
            | UniformType::Vec4
            | UniformType::FloatArray(_) => Some(ScalarKind::Float),
            UniformType::Int
            | UniformType::IVec2
            | UniformType::IVec3
            | UniformType::IVec4
            | UniformType::IntArray(_) => Some(ScalarKind::Int),
            UniformType::Mat4 | UniformType::Mat3 => None,
        }
    }

    /// Number of writable scalar slots and the byte stride between them.
    fn slots(self) -> (u32, u32) {
        match self {
            UniformType::FloatArray(len) | UniformType::IntArray(len) => (len, 16),
            other => (other.size() / 4, 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarKind {
    Float,
    Int,
}

/// A named member of the uniform struct, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub ty: UniformType,
}

impl UniformField {
    pub fn new(name: impl Into<String>, ty: UniformType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub ty: UniformType,
    pub offset: u32,
}

/// Byte layout of the uniform struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLayout {
    slots: Vec<UniformSlot>,
    size: u32,
}

impl UniformLayout {
    pub fn new(fields: &[UniformField]) -> Self {
        let mut offset = 0;
        let mut max_align = 16;
        let mut slots = Vec::with_capacity(fields.len());

        for field in fields {
            let align = field.ty.align();
            max_align = max_align.max(align);
            offset = align_to(offset, align);
            slots.push(UniformSlot {
                name: field.name.clone(),
                ty: field.ty,
                offset,
            });
            offset += field.ty.size();
        }

        Self {
            slots,
            size: align_to(offset.max(16), max_align),
        }
    }

    /// Struct size in bytes, rounded up to the struct alignment.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn find(&self, name: &str) -> Option<u32> {
        self.slots
            .iter()
            .position(|slot| slot.name == name)
            .map(|index| index as u32)
    }

    pub fn slot(&self, index: u32) -> Option<&UniformSlot> {
        self.slots.get(index as usize)
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }
}

pub(crate) fn align_to(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("uniform '{name}' is declared as {declared:?} but was written as {written}")]
pub struct UniformTypeMismatch {
    pub name: String,
    pub declared: UniformType,
    pub written: &'static str,
}

/// CPU side copy of a program's uniform struct.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size() as usize];
        Self { layout, bytes }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_matrix4(&mut self, index: u32, matrix: &[[f32; 4]; 4]) -> Result<(), UniformTypeMismatch> {
        let offset = self.expect(index, |ty| ty == UniformType::Mat4, "mat4x4<f32>")?;
        self.put(offset, bytemuck::cast_slice(matrix));
        Ok(())
    }

    /// Writes a 3x3 matrix as three columns padded to 16 bytes each.
    pub fn write_matrix3(&mut self, index: u32, matrix: &[[f32; 3]; 3]) -> Result<(), UniformTypeMismatch> {
        let offset = self.expect(index, |ty| ty == UniformType::Mat3, "mat3x3<f32>")?;
        for (column, values) in matrix.iter().enumerate() {
            self.put(offset + column * 16, bytemuck::cast_slice(values));
        }
        Ok(())
    }

    /// Writes up to as many floats as the member holds; extra values are dropped.
    pub fn write_floats(&mut self, index: u32, values: &[f32]) -> Result<(), UniformTypeMismatch> {
        let offset = self.expect(
            index,
            |ty| ty.scalar_kind() == Some(ScalarKind::Float),
            "f32 values",
        )?;
        let (count, stride) = self.slot_shape(index);
        for (i, value) in values.iter().take(count).enumerate() {
            self.put(offset + i * stride, bytemuck::bytes_of(value));
        }
        Ok(())
    }

    pub fn write_ints(&mut self, index: u32, values: &[i32]) -> Result<(), UniformTypeMismatch> {
        let offset = self.expect(
            index,
            |ty| ty.scalar_kind() == Some(ScalarKind::Int),
            "i32 values",
        )?;
        let (count, stride) = self.slot_shape(index);
        for (i, value) in values.iter().take(count).enumerate() {
            self.put(offset + i * stride, bytemuck::bytes_of(value));
        }
        Ok(())
    }

    fn slot_shape(&self, index: u32) -> (usize, usize) {
        self.layout
            .slot(index)
            .map(|slot| {
                let (count, stride) = slot.ty.slots();
                (count as usize, stride as usize)
            })
            .unwrap_or((0, 4))
    }

    fn expect(
        &self,
        index: u32,
        accepts: impl Fn(UniformType) -> bool,
        written: &'static str,
    ) -> Result<usize, UniformTypeMismatch> {
        match self.layout.slot(index) {
            Some(slot) if accepts(slot.ty) => Ok(slot.offset as usize),
            Some(slot) => Err(UniformTypeMismatch {
                name: slot.name.clone(),
                declared: slot.ty,
                written,
            }),
            None => Err(UniformTypeMismatch {
                name: format!("#{index}"),
                declared: UniformType::Float,
                written,
            }),
        }
    }

    fn put(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }
}

/// A value for [`ShaderProgram::set`](super::ShaderProgram::set).
///
/// The variant picks the uniform call used to upload it.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Matrix4(Matrix4<f32>),
    Matrix3(Matrix3<f32>),
    FloatVector(Vec<f32>),
    IntVector(Vec<i32>),
    Int(i32),
    Float(f32),
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(value: Matrix4<f32>) -> Self {
        UniformValue::Matrix4(value)
    }
}

impl From<Matrix3<f32>> for UniformValue {
    fn from(value: Matrix3<f32>) -> Self {
        UniformValue::Matrix3(value)
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(value: Vec<f32>) -> Self {
        UniformValue::FloatVector(value)
    }
}

impl From<&[f32]> for UniformValue {
    fn from(value: &[f32]) -> Self {
        UniformValue::FloatVector(value.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(value: [f32; N]) -> Self {
        UniformValue::FloatVector(value.to_vec())
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(value: Vec<i32>) -> Self {
        UniformValue::IntVector(value)
    }
}

impl From<&[i32]> for UniformValue {
    fn from(value: &[i32]) -> Self {
        UniformValue::IntVector(value.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(value: [i32; N]) -> Self {
        UniformValue::IntVector(value.to_vec())
    }
}

impl From<Vector2<f32>> for UniformValue {
    fn from(value: Vector2<f32>) -> Self {
        UniformValue::FloatVector(vec![value.x, value.y])
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(value: Vector3<f32>) -> Self {
        UniformValue::FloatVector(vec![value.x, value.y, value.z])
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(value: Vector4<f32>) -> Self {
        UniformValue::FloatVector(vec![value.x, value.y, value.z, value.w])
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Int(value as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}
