/// Homogeneous-coordinate transformation matrices in N dimensions
use log::trace;
use nalgebra::DMatrix;

use crate::error::GeometryError;

/// A (D+1)x(D+1) homogeneous transform
pub type Matrix = DMatrix<f64>;

/// Transform builder for a space of fixed dimension
///
/// Every matrix produced here is (D+1)x(D+1). Transforms compose by plain
/// matrix multiplication and apply right to left: in `a * b` the matrix `b`
/// acts on points first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    dimensions: usize,
}

impl Transform {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Number of Euclidean dimensions (D)
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Size of the homogeneous matrices (D+1)
    pub fn order(&self) -> usize {
        self.dimensions + 1
    }

    pub fn identity(&self) -> Matrix {
        Matrix::identity(self.order(), self.order())
    }

    /// Create a translation matrix
    ///
    /// The offset goes into the last column, whose final entry stays 1.
    /// Applied to `[x, 1]` this gives `[x + offset, 1]`.
    pub fn translation(&self, offset: &[f64]) -> Result<Matrix, GeometryError> {
        self.check_len(offset)?;
        let mut m = self.identity();
        for (i, &value) in offset.iter().enumerate() {
            m[(i, self.dimensions)] = value;
        }
        Ok(m)
    }

    /// Create a per-axis scale matrix
    ///
    /// The final diagonal slot is 0, not 1. An affine chain keeps its
    /// homogeneous 1 in the translation column, and the viewport matrix
    /// relies on this to carry a screen offset through the perspective
    /// divide.
    pub fn scaling(&self, factors: &[f64]) -> Result<Matrix, GeometryError> {
        self.check_len(factors)?;
        let mut m = Matrix::zeros(self.order(), self.order());
        for (i, &value) in factors.iter().enumerate() {
            m[(i, i)] = value;
        }
        Ok(m)
    }

    /// Create a rotation by `angle` radians in the plane of two axes
    ///
    /// Rotates counter-clockwise from `axis1` towards `axis2`, e.g.
    /// `rotation(FRAC_PI_2, 0, 2)` maps the x unit vector onto z.
    pub fn rotation(
        &self,
        angle: f64,
        axis1: usize,
        axis2: usize,
    ) -> Result<Matrix, GeometryError> {
        for axis in [axis1, axis2] {
            if axis >= self.dimensions {
                return Err(GeometryError::AxisOutOfRange {
                    axis,
                    dimensions: self.dimensions,
                });
            }
        }
        if axis1 == axis2 {
            return Err(GeometryError::DegeneratePlane(axis1));
        }

        let (s, c) = angle.sin_cos();
        let mut m = self.identity();
        m[(axis1, axis1)] = c;
        m[(axis1, axis2)] = -s;
        m[(axis2, axis1)] = s;
        m[(axis2, axis2)] = c;
        Ok(m)
    }

    /// Rotate about an arbitrary pivot: T(pivot) * R * T(-pivot)
    pub fn pivot_rotation(
        &self,
        pivot: &[f64],
        angle: f64,
        axis1: usize,
        axis2: usize,
    ) -> Result<Matrix, GeometryError> {
        let back: Vec<f64> = pivot.iter().map(|p| -p).collect();
        Ok(self.translation(pivot)?
            * self.rotation(angle, axis1, axis2)?
            * self.translation(&back)?)
    }

    /// Create the perspective projection matrix
    ///
    /// Identity except for the last row, which becomes `[0, ..., 0, 1, 0]`.
    /// Homogeneous `[x, y, z, 1]` maps to `[x, y, z, z]`, so the depth
    /// coordinate becomes the divisor of the perspective divide. The matrix
    /// is idempotent.
    pub fn projection(&self) -> Matrix {
        let mut m = self.identity();
        let last = self.dimensions;
        m[(last, last)] = 0.0;
        if last > 0 {
            m[(last, last - 1)] = 1.0;
        }
        m
    }

    /// Apply a homogeneous matrix to a batch of points
    ///
    /// `points` holds one point per column (D x K). A row of ones is
    /// appended, the matrix is applied, and the trailing homogeneous row is
    /// dropped again.
    pub fn apply(matrix: &Matrix, points: &Matrix) -> Result<Matrix, GeometryError> {
        let order = points.nrows() + 1;
        check_square(matrix, order)?;

        let result = matrix * homogenize(points);
        trace!("applied {}x{} matrix to {} points", order, order, points.ncols());
        Ok(result.remove_row(order - 1))
    }

    fn check_len(&self, values: &[f64]) -> Result<(), GeometryError> {
        if values.len() != self.dimensions {
            return Err(GeometryError::DimensionMismatch {
                expected: self.dimensions,
                found: values.len(),
            });
        }
        Ok(())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Append a row of ones to a D x K point batch
pub fn homogenize(points: &Matrix) -> Matrix {
    points.clone().insert_row(points.nrows(), 1.0)
}

/// Compose transforms so that the last one in the slice acts first
pub fn compose(matrices: &[Matrix]) -> Option<Matrix> {
    let (first, rest) = matrices.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, m| acc * m))
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(model: &Matrix, view: &Matrix, projection: &Matrix) -> Matrix {
    projection * view * model
}

/// Invert a transform, failing on singular matrices
pub fn invert(matrix: &Matrix) -> Result<Matrix, GeometryError> {
    matrix.clone().try_inverse().ok_or(GeometryError::Singular)
}

pub(crate) fn check_square(matrix: &Matrix, order: usize) -> Result<(), GeometryError> {
    if matrix.nrows() != order {
        return Err(GeometryError::DimensionMismatch {
            expected: order,
            found: matrix.nrows(),
        });
    }
    if matrix.ncols() != order {
        return Err(GeometryError::DimensionMismatch {
            expected: order,
            found: matrix.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

    fn sample_points(dimensions: usize) -> Matrix {
        Matrix::from_fn(dimensions, 10, |i, j| ((i * 7 + j * 13) % 11) as f64 / 11.0 - 0.3)
    }

    fn apply_to(matrix: &Matrix, point: &[f64]) -> Vec<f64> {
        let p = Matrix::from_column_slice(point.len(), 1, point);
        Transform::apply(matrix, &p).unwrap().iter().copied().collect()
    }

    #[test]
    fn test_identity_leaves_points_unchanged() {
        for d in 1..=5 {
            let t = Transform::new(d);
            let points = sample_points(d);
            let result = Transform::apply(&t.identity(), &points).unwrap();
            assert_relative_eq!(result, points, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_matrix_collapses_to_origin() {
        let points = sample_points(3);
        let result = Transform::apply(&Matrix::zeros(4, 4), &points).unwrap();
        assert_relative_eq!(result, Matrix::zeros(3, 10));
    }

    #[test]
    fn test_uniform_scaling() {
        let t = Transform::default();
        let points = sample_points(3);
        let result = Transform::apply(&t.scaling(&[2.0; 3]).unwrap(), &points).unwrap();
        assert_relative_eq!(result, points * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scaling_last_diagonal_is_zero() {
        let m = Transform::default().scaling(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m[(3, 3)], 0.0);
        assert_eq!(apply_to(&m, &[1.0, 1.0, 1.0]), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_translation() {
        let t = Transform::default();
        let m = t.translation(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(apply_to(&m, &[1.0, 1.0, 1.0]), vec![2.0, 3.0, 4.0]);

        let points = sample_points(3);
        let moved = Transform::apply(&m, &points).unwrap();
        for (j, column) in moved.column_iter().enumerate() {
            assert_relative_eq!(column[0], points[(0, j)] + 1.0, epsilon = 1e-12);
            assert_relative_eq!(column[1], points[(1, j)] + 2.0, epsilon = 1e-12);
            assert_relative_eq!(column[2], points[(2, j)] + 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotation_quarter_turns() {
        let t = Transform::default();
        let xy = t.rotation(FRAC_PI_2, 0, 1).unwrap();
        let p = apply_to(&xy, &[1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);

        // x lies on the rotation axis of the yz plane
        let yz = t.rotation(FRAC_PI_2, 1, 2).unwrap();
        let p = apply_to(&yz, &[1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_eighth_turn() {
        let m = Transform::default().rotation(FRAC_PI_4, 0, 1).unwrap();
        let p = apply_to(&m, &[1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(p[1], FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_in_four_dimensions() {
        let m = Transform::new(4).rotation(FRAC_PI_2, 1, 3).unwrap();
        let p = apply_to(&m, &[0.0, 1.0, 0.0, 0.0]);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_rejects_bad_axes() {
        let t = Transform::default();
        assert_eq!(
            t.rotation(0.1, 0, 3),
            Err(GeometryError::AxisOutOfRange { axis: 3, dimensions: 3 })
        );
        assert_eq!(t.rotation(0.1, 2, 2), Err(GeometryError::DegeneratePlane(2)));
    }

    #[test]
    fn test_pivot_rotation_fixes_pivot() {
        let t = Transform::default();
        let m = t.pivot_rotation(&[0.5, 0.5, 0.5], 1.0, 0, 1).unwrap();
        let p = apply_to(&m, &[0.5, 0.5, 0.5]);
        for value in p {
            assert_relative_eq!(value, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_projection_is_idempotent() {
        for d in 1..=4 {
            let p = Transform::new(d).projection();
            assert_relative_eq!(p.clone() * &p, p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_projection_copies_depth_into_w() {
        let p = Transform::default().projection();
        let result = &p * Matrix::from_column_slice(4, 1, &[2.0, 3.0, 5.0, 1.0]);
        assert_eq!(result.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 5.0, 5.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let t = Transform::default();
        assert_eq!(
            t.translation(&[1.0, 2.0]),
            Err(GeometryError::DimensionMismatch { expected: 3, found: 2 })
        );
        assert!(t.scaling(&[1.0; 4]).is_err());
        assert!(Transform::apply(&t.identity(), &Matrix::zeros(2, 5)).is_err());
    }

    #[test]
    fn test_compose_applies_right_to_left() {
        let t = Transform::default();
        let translate = t.translation(&[1.0, 0.0, 0.0]).unwrap();
        let rotate = t.rotation(FRAC_PI_2, 0, 1).unwrap();

        // rotate first, then translate
        let m = compose(&[translate.clone(), rotate.clone()]).unwrap();
        let p = apply_to(&m, &[1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-12);

        assert_relative_eq!(mvp_matrix(&rotate, &translate, &t.identity()), m, epsilon = 1e-12);
        assert!(compose(&[]).is_none());
    }

    #[test]
    fn test_invert() {
        let t = Transform::default();
        let m = t.translation(&[1.0, 2.0, 3.0]).unwrap() * t.rotation(0.3, 0, 2).unwrap();
        let inverse = invert(&m).unwrap();
        assert_relative_eq!(m * inverse, t.identity(), epsilon = 1e-12);
        assert_eq!(invert(&t.scaling(&[1.0; 3]).unwrap()), Err(GeometryError::Singular));
    }
}
