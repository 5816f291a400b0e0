/// Hyperview Core Library - N-dimensional geometry and projection
///
/// This library provides the stateless core of the renderer: homogeneous
/// transform matrices, hypercube meshes, STL loading and the camera and
/// projection pipeline that turns world-space triangles into screen space.

pub mod config;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, RenderConfig};
pub use error::GeometryError;
pub use geometry::{Mesh, MeshOperation, TriangleIndices};
pub use palette::{Palette, Rgb};
pub use projection::{project, Camera, Viewport};
pub use stl::LoadError;
pub use transform::{Matrix, Transform};
pub use world::{Object, ObjectKind, World};
