//! Viewer configuration.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::ViewerError;
use crate::gfx::color::Color;
use crate::gfx::scene::Scene;
use crate::interaction::Interaction;

pub const WIDTH_ENV: &str = "MODELPLANE_WIDTH";
pub const HEIGHT_ENV: &str = "MODELPLANE_HEIGHT";
pub const TITLE_ENV: &str = "MODELPLANE_TITLE";
pub const SHADER_DIR_ENV: &str = "MODELPLANE_SHADER_DIR";

const VERTEX_SHADER_FILE: &str = "viewer_shader.vert.wgsl";
const FRAGMENT_SHADER_FILE: &str = "viewer_shader.frag.wgsl";

/// Everything needed to open a viewer window.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub zoom_sensitivity: f32,
    pub x_move_sensitivity: f32,
    pub y_move_sensitivity: f32,
    pub background: Color,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        Self {
            title: "modelplane".to_string(),
            width: 1024,
            height: 768,
            fov: 70.0,
            near: 0.1,
            far: 800.0,
            vertex_shader: shader_dir.join(VERTEX_SHADER_FILE),
            fragment_shader: shader_dir.join(FRAGMENT_SHADER_FILE),
            zoom_sensitivity: Interaction::DEFAULT_ZOOM_SENSITIVITY,
            x_move_sensitivity: Interaction::DEFAULT_MOVE_SENSITIVITY,
            y_move_sensitivity: Interaction::DEFAULT_MOVE_SENSITIVITY,
            background: Scene::DEFAULT_BACKGROUND,
            vsync: true,
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_projection(mut self, fov: f32, near: f32, far: f32) -> Self {
        self.fov = fov;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_shaders(mut self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    /// Looks for the viewer shader pair in `dir`.
    pub fn with_shader_dir(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.with_shaders(dir.join(VERTEX_SHADER_FILE), dir.join(FRAGMENT_SHADER_FILE))
    }

    pub fn with_sensitivity(mut self, zoom: f32, x_move: f32, y_move: f32) -> Self {
        self.zoom_sensitivity = zoom;
        self.x_move_sensitivity = x_move;
        self.y_move_sensitivity = y_move;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Applies `MODELPLANE_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`. Unparsable sizes are
    /// logged and skipped.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(width) = parse_dimension(WIDTH_ENV, lookup(WIDTH_ENV)) {
            self.width = width;
        }
        if let Some(height) = parse_dimension(HEIGHT_ENV, lookup(HEIGHT_ENV)) {
            self.height = height;
        }
        if let Some(title) = lookup(TITLE_ENV) {
            self.title = title;
        }
        if let Some(dir) = lookup(SHADER_DIR_ENV) {
            self = self.with_shader_dir(dir);
        }
        self
    }

    /// Rejects zero dimensions and an empty title.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.title.trim().is_empty() {
            return Err(ViewerError::MissingTitle);
        }
        Ok(())
    }
}

fn parse_dimension(key: &str, value: Option<String>) -> Option<u32> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!("Ignoring {}={:?}: {}", key, value, error);
            None
        }
    }
}
