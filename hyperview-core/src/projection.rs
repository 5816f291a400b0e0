/// Camera and projection utilities
use log::trace;

use crate::error::GeometryError;
use crate::transform::{check_square, homogenize, Matrix, Transform};

/// Project object-space vertices onto the screen
///
/// The chain `projection * camera * object_to_world` is applied to the
/// homogenized vertices (D x K). The result keeps D rows: the first D-1 are
/// divided by w and hold screen coordinates, the last one is the undivided
/// depth. Vertices at or behind the camera come out non-finite or with a
/// negative depth; callers are expected to discard them.
pub fn project(
    projection: &Matrix,
    camera: &Matrix,
    object_to_world: &Matrix,
    vertices: &Matrix,
) -> Result<Matrix, GeometryError> {
    let dimensions = vertices.nrows();
    for matrix in [projection, camera, object_to_world] {
        check_square(matrix, dimensions + 1)?;
    }

    let combined = projection * camera * object_to_world;
    let raw = combined * homogenize(vertices);
    let w = raw.row(dimensions).into_owned();

    let mut screen = raw.remove_row(dimensions);
    for row in 0..dimensions.saturating_sub(1) {
        let divided = screen.row(row).component_div(&w);
        screen.set_row(row, &divided);
    }
    trace!("projected {} vertices", vertices.ncols());
    Ok(screen)
}

/// Maps perspective-divided coordinates to screen units
///
/// `scale` and `offset` each have one entry per screen axis (D-1).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scale: Vec<f64>,
    pub offset: Vec<f64>,
}

impl Viewport {
    pub fn new(scale: Vec<f64>, offset: Vec<f64>) -> Self {
        Self { scale, offset }
    }

    /// Create the projection matrix `T(offset, 0) * P * S(scale, 1)`
    ///
    /// The scaling matrix zeroes the homogeneous coordinate, so the
    /// trailing translation is multiplied by w and survives the divide as a
    /// plain screen offset.
    pub fn projection_matrix(&self, transform: &Transform) -> Result<Matrix, GeometryError> {
        let mut scale = self.scale.clone();
        scale.push(1.0);
        let mut offset = self.offset.clone();
        offset.push(0.0);
        Ok(transform.translation(&offset)? * transform.projection() * transform.scaling(&scale)?)
    }
}

/// The viewer: a world-to-camera matrix plus a per-tick orbit
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    transform: Transform,
    matrix: Matrix,
    orbit: Matrix,
}

impl Camera {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            matrix: transform.identity(),
            orbit: transform.identity(),
        }
    }

    /// Orbit by `step` radians per tick in the plane of `axes` around `pivot`
    pub fn with_orbit(
        mut self,
        pivot: &[f64],
        step: f64,
        axes: (usize, usize),
    ) -> Result<Self, GeometryError> {
        self.orbit = self.transform.pivot_rotation(pivot, step, axes.0, axes.1)?;
        Ok(self)
    }

    /// World-to-camera matrix
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn orbit(&self) -> &Matrix {
        &self.orbit
    }

    /// Advance one tick: `camera = camera * orbit`
    pub fn advance(&mut self) {
        self.matrix = &self.matrix * &self.orbit;
    }

    /// Move everything in view by `offset` (in camera space)
    pub fn pan(&mut self, offset: &[f64]) -> Result<(), GeometryError> {
        self.matrix = self.transform.translation(offset)? * &self.matrix;
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Transform::default())
    }
}
