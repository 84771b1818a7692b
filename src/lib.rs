// src/lib.rs
//! modelplane
//!
//! An interactive 3D model viewer built on wgpu and winit: a small shape
//! hierarchy drawn through a shader program, orbited with a trackball camera.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod logging;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ModelplaneApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use viewer::Viewer;

/// Creates the viewer application with the default configuration and any
/// `MODELPLANE_*` environment overrides.
pub fn default() -> anyhow::Result<ModelplaneApp> {
    ModelplaneApp::new(ViewerConfig::default().with_env())
}
