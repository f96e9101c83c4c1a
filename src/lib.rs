//! rein contact solver
//!
//! Resolves 2D rigid-body contacts with sequential impulses: non-penetration,
//! Coulomb friction and restitution, one step at a time.
//!
//! # Architecture
//!
//! 1. **physics::contact** - Contacts, manifolds and the warm-start cache
//! 2. **physics::rigid_body** - Body state and the [`BodySet`] impulse contract
//! 3. **physics::solver** - Constraint preparation and velocity passes
//! 4. **physics** - [`SolverConfig`] and the [`ContactSolver`] step driver
//! 5. **ecs** - hecs world as a body set (feature = "ecs")
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use rein_contact::{Contact, ContactManifold, ContactSolver, RigidBody, SolverConfig};
//!
//! let mut bodies = vec![
//!     RigidBody::new_fixed(),
//!     RigidBody::new_dynamic(1.0, 1.0)
//!         .with_position(Vec2::new(0.0, 0.45))
//!         .with_linear_velocity(Vec2::new(0.0, -1.0)),
//! ];
//! // The normal points from body B (the ball) toward body A (the ground).
//! let mut manifolds = vec![ContactManifold::new(0, 1, Vec2::NEG_Y, 1.0)
//!     .with_restitution(1.0)
//!     .with_contact(Contact::new(Vec2::new(0.0, -0.05), 0.05))];
//!
//! let mut solver = ContactSolver::new(SolverConfig::default()).unwrap();
//! solver.step(&mut manifolds, &mut bodies, 1.0 / 60.0).unwrap();
//!
//! assert!(bodies[1].linear_velocity.y >= 0.0);
//! ```

pub mod physics;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use physics::{
    BodySet, BodySnapshot, Contact, ContactCache, ContactManifold, ContactSolver, RestitutionMode,
    RigidBody, RigidBodyType, SleepState, SolverConfig, SolverError,
};
