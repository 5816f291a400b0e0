/// Objects placed in a world and the list that holds them
use log::debug;

use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::transform::{check_square, invert, Matrix};

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// A static light-giving body
    Sun,
    /// A body drifting with a constant velocity
    Body { velocity: Vec<f64> },
    /// A player-controlled ship
    Spaceship,
}

/// A mesh positioned in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub kind: ObjectKind,
    pub mesh: Mesh,
    world_to_object: Matrix,
    object_to_world: Matrix,
}

impl Object {
    /// Place `mesh` in the world
    ///
    /// The placement is given as a world-to-object matrix matching the
    /// mesh's dimension and must be invertible.
    pub fn new(
        kind: ObjectKind,
        world_to_object: Matrix,
        mesh: Mesh,
    ) -> Result<Self, GeometryError> {
        check_square(&world_to_object, mesh.dimensions() + 1)?;
        let object_to_world = invert(&world_to_object)?;
        Ok(Self {
            kind,
            mesh,
            world_to_object,
            object_to_world,
        })
    }

    pub fn sun(world_to_object: Matrix, mesh: Mesh) -> Result<Self, GeometryError> {
        Self::new(ObjectKind::Sun, world_to_object, mesh)
    }

    pub fn world_to_object(&self) -> &Matrix {
        &self.world_to_object
    }

    pub fn object_to_world(&self) -> &Matrix {
        &self.object_to_world
    }

    pub fn update(&mut self) -> Result<(), GeometryError> {
        match self.kind {
            ObjectKind::Sun | ObjectKind::Body { .. } => Ok(()),
            ObjectKind::Spaceship => Err(GeometryError::Unsupported("spaceship control")),
        }
    }
}

/// An ordered collection of objects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    objects: Vec<Object>,
}

impl World {
    pub fn new(objects: Vec<Object>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Remove the object at `index`, keeping the order of the rest
    pub fn destroy_object(&mut self, index: usize) -> Option<Object> {
        (index < self.objects.len()).then(|| self.objects.remove(index))
    }

    /// Update every object in order, stopping at the first failure
    pub fn update(&mut self) -> Result<(), GeometryError> {
        for object in &mut self.objects {
            object.update()?;
        }
        debug!("updated {} objects", self.objects.len());
        Ok(())
    }

    pub fn resolve_collisions(&mut self) -> Result<(), GeometryError> {
        Err(GeometryError::Unsupported("collision resolution"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube;
    use crate::transform::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn test_object_to_world_is_inverse() {
        let t = Transform::default();
        let placement = t.translation(&[1.0, 2.0, 3.0]).unwrap() * t.rotation(0.4, 0, 1).unwrap();
        let object = Object::sun(placement.clone(), cube::generate(3).unwrap()).unwrap();
        assert_relative_eq!(object.object_to_world() * &placement, t.identity(), epsilon = 1e-12);
        assert_eq!(object.world_to_object(), &placement);
    }

    #[test]
    fn test_singular_placement_fails() {
        let t = Transform::default();
        let result = Object::sun(t.scaling(&[1.0; 3]).unwrap(), cube::generate(3).unwrap());
        assert_eq!(result, Err(GeometryError::Singular));
    }

    #[test]
    fn test_update_kinds() {
        let t = Transform::default();
        let mesh = cube::generate(3).unwrap();
        let body = ObjectKind::Body {
            velocity: vec![0.0, 1.0, 0.0],
        };
        let mut world = World::new(vec![
            Object::sun(t.identity(), mesh.clone()).unwrap(),
            Object::new(body, t.identity(), mesh.clone()).unwrap(),
        ]);
        assert!(world.update().is_ok());

        world.add_object(Object::new(ObjectKind::Spaceship, t.identity(), mesh).unwrap());
        assert_eq!(
            world.update(),
            Err(GeometryError::Unsupported("spaceship control"))
        );
    }

    #[test]
    fn test_add_and_destroy() {
        let mut world = World::default();
        for d in 1..=3 {
            let placement = Transform::new(d).identity();
            world.add_object(Object::sun(placement, cube::generate(d).unwrap()).unwrap());
        }
        assert_eq!(world.objects().len(), 3);

        let removed = world.destroy_object(1).unwrap();
        assert_eq!(removed.mesh.dimensions(), 2);
        assert_eq!(world.objects().len(), 2);
        assert_eq!(world.objects()[1].mesh.dimensions(), 3);
        assert!(world.destroy_object(5).is_none());
    }

    #[test]
    fn test_placement_must_match_mesh() {
        let result = Object::sun(Transform::new(4).identity(), cube::generate(3).unwrap());
        assert_eq!(
            result,
            Err(GeometryError::DimensionMismatch { expected: 4, found: 5 })
        );
    }

    #[test]
    fn test_collisions_are_unsupported() {
        let mut world = World::default();
        assert!(matches!(
            world.resolve_collisions(),
            Err(GeometryError::Unsupported(_))
        ));
    }
}
