/// Triangle meshes in N-dimensional space
use std::collections::HashMap;

use log::debug;
use nalgebra::DVector;

use crate::error::GeometryError;
use crate::transform::{Matrix, Transform};

/// Indices of three vertex-table columns; winding order matters
pub type TriangleIndices = [usize; 3];

/// Operations that can be requested on a mesh
///
/// Only `Transform` has an implementation. The others exist so callers get
/// an explicit error instead of a silent no-op.
#[derive(Debug, Clone)]
pub enum MeshOperation {
    Transform(Matrix),
    Unite(Mesh),
    Shift(Vec<f64>),
    Rescale(f64),
    Rotate { angle: f64, axis: usize },
}

/// A mesh: a D x K vertex table (one point per column) and a triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Matrix,
    pub triangles: Vec<TriangleIndices>,
}

impl Mesh {
    pub fn new(vertices: Matrix, triangles: Vec<TriangleIndices>) -> Result<Self, GeometryError> {
        let count = vertices.ncols();
        if let Some(&index) = triangles.iter().flatten().find(|&&index| index >= count) {
            return Err(GeometryError::VertexOutOfRange { index, count });
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Build a mesh from triangles given as explicit points
    ///
    /// Points with identical coordinates share one vertex; vertices are
    /// numbered in the order they are first seen.
    pub fn from_triangle_soup(
        dimensions: usize,
        soup: &[[Vec<f64>; 3]],
    ) -> Result<Self, GeometryError> {
        if dimensions == 0 {
            return Err(GeometryError::InvalidDimension(0));
        }
        let mut lookup: HashMap<Vec<u64>, usize> = HashMap::new();
        let mut coordinates: Vec<f64> = Vec::new();
        let mut triangles = Vec::with_capacity(soup.len());

        for corners in soup {
            let mut triangle = [0usize; 3];
            for (slot, point) in triangle.iter_mut().zip(corners) {
                if point.len() != dimensions {
                    return Err(GeometryError::DimensionMismatch {
                        expected: dimensions,
                        found: point.len(),
                    });
                }
                // adding 0.0 folds -0.0 into 0.0
                let key: Vec<u64> = point.iter().map(|c| (c + 0.0).to_bits()).collect();
                *slot = *lookup.entry(key).or_insert_with(|| {
                    coordinates.extend_from_slice(point);
                    coordinates.len() / dimensions - 1
                });
            }
            triangles.push(triangle);
        }

        let count = lookup.len();
        debug!(
            "deduplicated {} corners into {} vertices",
            soup.len() * 3,
            count
        );
        Ok(Self {
            vertices: Matrix::from_column_slice(dimensions, count, &coordinates),
            triangles,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.ncols()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex(&self, index: usize) -> Option<DVector<f64>> {
        (index < self.vertex_count()).then(|| self.vertices.column(index).into_owned())
    }

    /// Replace every vertex `v` with `matrix * v` (in homogeneous form)
    pub fn transform(&mut self, matrix: &Matrix) -> Result<(), GeometryError> {
        self.vertices = Transform::apply(matrix, &self.vertices)?;
        Ok(())
    }

    pub fn apply(&mut self, operation: MeshOperation) -> Result<(), GeometryError> {
        match operation {
            MeshOperation::Transform(matrix) => self.transform(&matrix),
            MeshOperation::Unite(_) => Err(GeometryError::Unsupported("mesh union")),
            MeshOperation::Shift(_) => Err(GeometryError::Unsupported("mesh shift")),
            MeshOperation::Rescale(_) => Err(GeometryError::Unsupported("mesh rescale")),
            MeshOperation::Rotate { .. } => Err(GeometryError::Unsupported("mesh rotate")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::invert;
    use approx::assert_relative_eq;

    fn square() -> Mesh {
        Mesh::new(
            Matrix::from_row_slice(2, 4, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0]),
            vec![[0, 1, 3], [3, 1, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_dangling_index() {
        let result = Mesh::new(Matrix::zeros(3, 2), vec![[0, 1, 2]]);
        assert_eq!(result, Err(GeometryError::VertexOutOfRange { index: 2, count: 2 }));
    }

    #[test]
    fn test_accessors() {
        let mesh = square();
        assert_eq!(mesh.dimensions(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex(3).unwrap().as_slice(), &[1.0, 1.0]);
        assert!(mesh.vertex(4).is_none());
    }

    #[test]
    fn test_transform_round_trip() {
        let t = Transform::default();
        let mut mesh = Mesh::new(
            Matrix::from_fn(3, 6, |i, j| (i + 2 * j) as f64 * 0.25),
            vec![[0, 1, 2], [3, 4, 5]],
        )
        .unwrap();
        let original = mesh.clone();

        let m = t.translation(&[0.5, -1.0, 2.0]).unwrap()
            * t.rotation(0.7, 0, 2).unwrap()
            * t.rotation(-0.2, 1, 2).unwrap();
        mesh.transform(&m).unwrap();
        assert!((&mesh.vertices - &original.vertices).norm() > 1e-3);

        mesh.transform(&invert(&m).unwrap()).unwrap();
        assert_relative_eq!(mesh.vertices, original.vertices, epsilon = 1e-9);
        assert_eq!(mesh.triangles, original.triangles);
    }

    #[test]
    fn test_transform_rejects_wrong_order() {
        let mut mesh = square();
        let result = mesh.transform(&Transform::default().identity());
        assert_eq!(
            result,
            Err(GeometryError::DimensionMismatch { expected: 3, found: 4 })
        );
    }

    #[test]
    fn test_apply_transform_operation() {
        let mut mesh = square();
        let scale = Transform::new(2).scaling(&[2.0, 3.0]).unwrap();
        mesh.apply(MeshOperation::Transform(scale)).unwrap();
        assert_eq!(mesh.vertex(3).unwrap().as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_unsupported_operations_fail() {
        let mut mesh = square();
        let other = square();
        let operations = vec![
            MeshOperation::Unite(other),
            MeshOperation::Shift(vec![1.0, 0.0]),
            MeshOperation::Rescale(2.0),
            MeshOperation::Rotate { angle: 0.5, axis: 0 },
        ];
        for operation in operations {
            assert!(matches!(
                mesh.apply(operation),
                Err(GeometryError::Unsupported(_))
            ));
        }
        assert_eq!(mesh, square());
    }

    #[test]
    fn test_triangle_soup_deduplicates() {
        let soup = vec![
            [vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            [vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 0.0], vec![1.0, 1.0, -0.0]],
        ];
        let mesh = Mesh::from_triangle_soup(3, &soup).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [2, 1, 3]]);
        assert_eq!(mesh.vertex(3).unwrap().as_slice(), &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_triangle_soup_signed_zero_is_one_vertex() {
        let soup = vec![[vec![0.0, 0.0], vec![-0.0, 0.0], vec![1.0, 0.0]]];
        let mesh = Mesh::from_triangle_soup(2, &soup).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.triangles, vec![[0, 0, 1]]);
    }

    #[test]
    fn test_triangle_soup_rejects_wrong_dimension() {
        let soup = vec![[vec![0.0, 0.0], vec![1.0, 0.0, 0.0], vec![1.0, 1.0]]];
        assert!(matches!(
            Mesh::from_triangle_soup(2, &soup),
            Err(GeometryError::DimensionMismatch { expected: 2, found: 3 })
        ));
    }
}
