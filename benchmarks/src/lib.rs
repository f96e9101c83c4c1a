//! Shared setup helpers for rein-contact benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench solver
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench solver -- stack

use glam::Vec2;
use rein_contact::{Contact, ContactManifold, RigidBody};

// ---------------------------------------------------------------------------
// Stacks
// ---------------------------------------------------------------------------

/// A vertical stack of `n` unit boxes on fixed ground, two contacts per layer.
///
/// Body 0 is the ground; body `i + 1` rests on body `i`.
pub fn setup_stack(n: usize) -> (Vec<RigidBody>, Vec<ContactManifold<usize>>) {
    let mut bodies = Vec::with_capacity(n + 1);
    bodies.push(RigidBody::new_fixed().with_position(Vec2::new(0.0, -0.5)));
    for i in 0..n {
        bodies.push(
            RigidBody::new_dynamic(1.0, 1.0 / 6.0)
                .with_position(Vec2::new(0.0, 0.5 + i as f32))
                .with_linear_velocity(Vec2::new(0.0, -0.1635)),
        );
    }

    let manifolds = (0..n)
        .map(|i| {
            let inverse_mass = bodies[i].inv_mass + bodies[i + 1].inv_mass;
            let y = i as f32;
            ContactManifold::new(i, i + 1, Vec2::NEG_Y, inverse_mass)
                .with_restitution(1.0)
                .with_friction(0.5)
                .with_contact(Contact::new(Vec2::new(-0.5, y), 0.01))
                .with_contact(Contact::new(Vec2::new(0.5, y), 0.01))
        })
        .collect();

    (bodies, manifolds)
}

/// The same stack stored in a hecs world.
pub fn setup_stack_world(n: usize) -> (hecs::World, Vec<ContactManifold<hecs::Entity>>) {
    let (bodies, manifolds) = setup_stack(n);
    let mut world = hecs::World::new();
    let entities: Vec<hecs::Entity> = bodies.into_iter().map(|rb| world.spawn((rb,))).collect();

    let manifolds = manifolds
        .into_iter()
        .map(|m| ContactManifold {
            body_a: entities[m.body_a],
            body_b: entities[m.body_b],
            normal: m.normal,
            tangent: m.tangent,
            inverse_mass: m.inverse_mass,
            restitution: m.restitution,
            friction: m.friction,
            active: m.active,
            contacts: m.contacts,
        })
        .collect();

    (world, manifolds)
}
