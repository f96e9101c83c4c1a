//! hecs integration: bodies stored as [`RigidBody`] components.
//!
//! A `hecs::World` is a [`BodySet`] keyed by [`hecs::Entity`], so manifolds
//! produced by an ECS collision pass can be solved in place.

use glam::Vec2;

use crate::physics::rigid_body::{BodySet, BodySnapshot, RigidBody};

impl BodySet for hecs::World {
    type Handle = hecs::Entity;

    fn body(&self, entity: hecs::Entity) -> Option<BodySnapshot> {
        self.get::<&RigidBody>(entity).ok().map(|rb| rb.snapshot())
    }

    fn apply_impulse(&mut self, entity: hecs::Entity, impulse: Vec2, offset: Vec2) {
        if let Ok(mut rb) = self.get::<&mut RigidBody>(entity) {
            rb.apply_impulse(impulse, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{
        Contact, ContactManifold, ContactSolver, RestitutionMode, SolverConfig, SolverError,
    };

    #[test]
    fn test_world_body_set() {
        let mut world = hecs::World::new();
        let entity = world.spawn((RigidBody::new_dynamic(2.0, 1.0),));
        let bare = world.spawn((0u32,));

        assert!(world.body(bare).is_none());
        world.apply_impulse(bare, Vec2::ONE, Vec2::ZERO);

        world.apply_impulse(entity, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        let snapshot = world.body(entity).unwrap();
        assert_eq!(snapshot.linear_velocity, Vec2::new(0.5, 0.0));
        assert!((snapshot.angular_velocity - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_solve_entities_head_on() {
        let mut world = hecs::World::new();
        let a = world.spawn((RigidBody::new_dynamic(1.0, 1.0).with_position(Vec2::new(-0.5, 0.0)),));
        let b = world.spawn((RigidBody::new_dynamic(1.0, 1.0)
            .with_position(Vec2::new(0.5, 0.0))
            .with_linear_velocity(Vec2::new(-2.0, 0.0)),));

        let mut manifolds = vec![ContactManifold::new(a, b, Vec2::NEG_X, 2.0)
            .with_restitution(0.5)
            .with_contact(Contact::new(Vec2::ZERO, 0.0))];

        let mut solver = ContactSolver::new(SolverConfig {
            restitution_mode: RestitutionMode::Classical,
            ..SolverConfig::default()
        })
        .unwrap();
        solver.step(&mut manifolds, &mut world, 1.0 / 60.0).unwrap();

        let va = world.get::<&RigidBody>(a).unwrap().linear_velocity;
        let vb = world.get::<&RigidBody>(b).unwrap().linear_velocity;
        assert!((va.x - (-1.5)).abs() < 1e-5);
        assert!((vb.x - (-0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_despawned_entity_is_reported() {
        let mut world = hecs::World::new();
        let a = world.spawn((RigidBody::new_fixed(),));
        let b = world.spawn((RigidBody::new_dynamic(1.0, 1.0),));
        world.despawn(b).unwrap();

        let mut manifolds = vec![ContactManifold::new(a, b, Vec2::Y, 1.0)
            .with_contact(Contact::new(Vec2::ZERO, 0.1))];
        let mut solver = ContactSolver::new(SolverConfig::default()).unwrap();

        let err = solver.step(&mut manifolds, &mut world, 1.0 / 60.0).unwrap_err();
        assert_eq!(err, SolverError::MissingBody { manifold: 0 });
    }
}
