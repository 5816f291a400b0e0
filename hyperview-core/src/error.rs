/// Error types shared by the geometry core
use thiserror::Error;

/// Errors raised by the matrix algebra, meshes and world objects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An operand has the wrong number of dimensions
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A rotation axis does not exist in this space
    #[error("axis {axis} is out of range for a {dimensions}-dimensional space")]
    AxisOutOfRange { axis: usize, dimensions: usize },

    /// A rotation plane was given the same axis twice
    #[error("rotation plane needs two distinct axes, got axis {0} twice")]
    DegeneratePlane(usize),

    /// A cube was requested with fewer than one dimension
    #[error("cannot build a {0}-dimensional cube")]
    InvalidDimension(usize),

    /// A matrix that has to be inverted is singular
    #[error("matrix is not invertible")]
    Singular,

    /// A triangle refers to a vertex that does not exist
    #[error("triangle references vertex {index} but the mesh has {count} vertices")]
    VertexOutOfRange { index: usize, count: usize },

    /// The operation exists but has no implementation
    #[error("{0} is not implemented")]
    Unsupported(&'static str),
}
