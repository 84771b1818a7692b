//! # Shader Programs
//!
//! A shader program is a vertex and a fragment WGSL stage linked into one
//! render pipeline, plus the declared interface used to resolve uniform and
//! attribute names.
//!
//! ## Uniform access
//!
//! Values are written by name through [`ShaderProgram::set`], which resolves
//! the name against the program's uniform struct, falls back to the vertex
//! attributes, and otherwise reports [`ShaderError::UnknownName`].
//!
//! [`ShaderError::UnknownName`]: crate::error::ShaderError::UnknownName

pub mod program;
pub mod uniform;

use std::borrow::Cow;
use std::fmt;

pub use program::ShaderProgram;
pub use uniform::{
    UniformBlock, UniformField, UniformLayout, UniformSlot, UniformType, UniformTypeMismatch,
    UniformValue,
};

use crate::gfx::scene::vertex::ColorVertex;

pub const PROJECTION_UNIFORM: &str = "u_projection";
pub const MODELVIEW_UNIFORM: &str = "u_modelview";
pub const SELECTED_UNIFORM: &str = "u_selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL text for both stages. Entry points are `vs_main` and `fs_main`.
#[derive(Debug, Clone)]
pub struct ShaderSources<'a> {
    pub vertex: Cow<'a, str>,
    pub fragment: Cow<'a, str>,
}

impl<'a> ShaderSources<'a> {
    pub fn new(vertex: impl Into<Cow<'a, str>>, fragment: impl Into<Cow<'a, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn get(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Named vertex input of the vertex stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: String,
    pub location: u32,
}

/// Everything a backend needs to know about a program besides its source.
#[derive(Debug, Clone)]
pub struct ShaderInterface {
    pub uniforms: Vec<UniformField>,
    pub attributes: Vec<VertexAttribute>,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
}

impl ShaderInterface {
    /// Interface of the bundled `viewer_shader` pair.
    pub fn viewer() -> Self {
        Self {
            uniforms: vec![
                UniformField::new(PROJECTION_UNIFORM, UniformType::Mat4),
                UniformField::new(MODELVIEW_UNIFORM, UniformType::Mat4),
                UniformField::new(SELECTED_UNIFORM, UniformType::Int),
            ],
            attributes: vec![
                VertexAttribute {
                    name: "a_position".into(),
                    location: 0,
                },
                VertexAttribute {
                    name: "a_color".into(),
                    location: 1,
                },
            ],
            vertex_layout: ColorVertex::desc(),
        }
    }
}

/// Name lookup tables a backend keeps per linked program.
#[derive(Debug, Clone)]
pub struct ProgramInterface {
    layout: UniformLayout,
    attributes: Vec<VertexAttribute>,
}

impl ProgramInterface {
    pub fn new(interface: &ShaderInterface) -> Self {
        Self {
            layout: UniformLayout::new(&interface.uniforms),
            attributes: interface.attributes.clone(),
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn uniform_index(&self, name: &str) -> Option<u32> {
        self.layout.find(name)
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.location)
    }
}
