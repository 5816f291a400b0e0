/// Hypercube construction in arbitrary dimension
///
/// The unit D-cube is built bottom-up from the unit square. Each step
/// extrudes the previous cube along a new axis, doubling the vertex table
/// and deriving the new quad faces from the old ones. Quads are finally
/// split into triangles in both windings so no face culling is needed.
use std::collections::HashSet;

use log::debug;

use crate::error::GeometryError;
use crate::geometry::{Mesh, TriangleIndices};
use crate::transform::Matrix;

/// Four vertex-table indices of a square face, in winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadFace(pub [usize; 4]);

impl QuadFace {
    /// The four edges as consecutive vertex pairs, wrapping around
    pub fn edges(&self) -> [(usize, usize); 4] {
        let v = self.0;
        [(v[0], v[1]), (v[1], v[2]), (v[2], v[3]), (v[3], v[0])]
    }

    fn shifted(&self, by: usize) -> Self {
        Self(self.0.map(|index| index + by))
    }

    fn key(&self) -> [usize; 4] {
        let mut key = self.0;
        key.sort_unstable();
        key
    }
}

/// Vertices and quad faces of a cube of some dimension
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSkeleton {
    pub vertices: Matrix,
    pub faces: Vec<QuadFace>,
}

impl CubeSkeleton {
    /// The unit square with one face
    pub fn square() -> Self {
        Self {
            vertices: Matrix::from_row_slice(2, 4, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
            faces: vec![QuadFace([0, 1, 3, 2])],
        }
    }

    pub fn dimensions(&self) -> usize {
        self.vertices.nrows()
    }

    /// Extrude along a new last axis
    ///
    /// Vertex `i` becomes `2i` (new coordinate 0) and `2i + 1` (new
    /// coordinate 1). Every face contributes itself, its copy shifted by the
    /// old vertex count, and one quad per edge joining the two. A quad whose
    /// vertex set was already emitted is skipped.
    pub fn extrude(&self) -> Self {
        let dimensions = self.dimensions();
        let count = self.vertices.ncols();

        let vertices = Matrix::from_fn(dimensions + 1, count * 2, |row, col| {
            if row < dimensions {
                self.vertices[(row, col / 2)]
            } else {
                (col % 2) as f64
            }
        });

        let mut seen = HashSet::new();
        let mut faces = Vec::with_capacity(self.faces.len() * 6);
        let mut push = |face: QuadFace| {
            if seen.insert(face.key()) {
                faces.push(face);
            }
        };
        for face in &self.faces {
            push(*face);
            push(face.shifted(count));
            for (a, b) in face.edges() {
                push(QuadFace([a, b, b + count, a + count]));
            }
        }

        Self { vertices, faces }
    }

    pub fn triangulate(&self) -> Vec<TriangleIndices> {
        self.faces.iter().flat_map(|face| quad_to_triangles(*face)).collect()
    }
}

/// Split a quad into both windings of its two triangles
pub fn quad_to_triangles(QuadFace([a, b, c, d]): QuadFace) -> [TriangleIndices; 4] {
    [[a, b, c], [c, b, a], [a, d, c], [c, d, a]]
}

/// Build the quad skeleton of the unit cube, D >= 2
pub fn skeleton(dimensions: usize) -> Result<CubeSkeleton, GeometryError> {
    if dimensions < 2 {
        return Err(GeometryError::InvalidDimension(dimensions));
    }
    let mut cube = CubeSkeleton::square();
    while cube.dimensions() < dimensions {
        cube = cube.extrude();
    }
    Ok(cube)
}

/// Create the unit cube [0, 1]^D as a triangle mesh
///
/// A 1-cube is a segment, stored as the single degenerate triangle
/// `(0, 0, 1)`.
pub fn generate(dimensions: usize) -> Result<Mesh, GeometryError> {
    match dimensions {
        0 => Err(GeometryError::InvalidDimension(0)),
        1 => Mesh::new(Matrix::from_row_slice(1, 2, &[0.0, 1.0]), vec![[0, 0, 1]]),
        _ => {
            let cube = skeleton(dimensions)?;
            let triangles = cube.triangulate();
            debug!(
                "generated {}-cube: {} vertices, {} faces, {} triangles",
                dimensions,
                cube.vertices.ncols(),
                cube.faces.len(),
                triangles.len()
            );
            Mesh::new(cube.vertices, triangles)
        }
    }
}

pub fn sphere(_dimensions: usize) -> Result<Mesh, GeometryError> {
    Err(GeometryError::Unsupported("sphere generation"))
}
