#[allow(clippy::module_inception)]
pub mod camera;
pub mod trackball;

// Re-export main types
pub use camera::Camera;
pub use trackball::Trackball;
