//! Rigid body state and the impulse-application contract used by the solver.

use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec2;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Affected by contact impulses.
    Dynamic,
    /// Immovable. Its velocity is still read when computing relative motion.
    Fixed,
}

/// Sleep state managed by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepState {
    #[default]
    Awake,
    /// Treated as immovable by the solver until woken.
    Sleeping,
}

/// A 2D rigid body.
///
/// Mass properties are stored as inverses so that fixed bodies carry zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub body_type: RigidBodyType,
    pub sleep_state: SleepState,
    /// Center of mass in world space.
    pub position: Vec2,
    pub linear_velocity: Vec2,
    /// Counter-clockwise angular velocity in radians per second.
    pub angular_velocity: f32,
    pub inv_mass: f32,
    pub inv_inertia: f32,
}

impl RigidBody {
    /// Create a dynamic body at the origin.
    ///
    /// Non-positive mass or inertia yields a zero inverse on that axis.
    pub fn new_dynamic(mass: f32, inertia: f32) -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            sleep_state: SleepState::Awake,
            position: Vec2::ZERO,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            inv_inertia: if inertia > 0.0 { 1.0 / inertia } else { 0.0 },
        }
    }

    /// Create a fixed body at the origin.
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            sleep_state: SleepState::Awake,
            position: Vec2::ZERO,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Fixed and sleeping bodies do not respond to impulses.
    pub fn is_immovable(&self) -> bool {
        self.body_type == RigidBodyType::Fixed || self.sleep_state == SleepState::Sleeping
    }

    /// Velocity of the material point at `offset` from the center of mass.
    pub fn velocity_at(&self, offset: Vec2) -> Vec2 {
        self.linear_velocity + self.angular_velocity * offset.perp()
    }

    /// Apply `impulse` at `offset` from the center of mass.
    ///
    /// This is the raw mutation; callers that honour fixed and sleeping
    /// bodies check [`is_immovable`](Self::is_immovable) first.
    pub fn apply_impulse(&mut self, impulse: Vec2, offset: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * offset.perp_dot(impulse);
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: self.position,
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
            inv_inertia: self.inv_inertia,
            immovable: self.is_immovable(),
        }
    }
}

/// Copy of the body data the solver reads while resolving one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub position: Vec2,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub inv_inertia: f32,
    pub immovable: bool,
}

impl BodySnapshot {
    /// Velocity of the material point at `offset` from the center of mass.
    pub fn velocity_at(&self, offset: Vec2) -> Vec2 {
        self.linear_velocity + self.angular_velocity * offset.perp()
    }
}

/// Storage the solver reads bodies from and writes impulses back into.
pub trait BodySet {
    type Handle: Copy + Eq + Hash + Debug;

    /// Current state of `handle`, or `None` if it does not resolve.
    fn body(&self, handle: Self::Handle) -> Option<BodySnapshot>;

    /// Change the body's velocity by `impulse` applied at `offset`.
    ///
    /// Unknown handles are ignored.
    fn apply_impulse(&mut self, handle: Self::Handle, impulse: Vec2, offset: Vec2);
}

impl BodySet for [RigidBody] {
    type Handle = usize;

    fn body(&self, handle: usize) -> Option<BodySnapshot> {
        self.get(handle).map(RigidBody::snapshot)
    }

    fn apply_impulse(&mut self, handle: usize, impulse: Vec2, offset: Vec2) {
        if let Some(rb) = self.get_mut(handle) {
            rb.apply_impulse(impulse, offset);
        }
    }
}

impl BodySet for Vec<RigidBody> {
    type Handle = usize;

    fn body(&self, handle: usize) -> Option<BodySnapshot> {
        self.as_slice().body(handle)
    }

    fn apply_impulse(&mut self, handle: usize, impulse: Vec2, offset: Vec2) {
        self.as_mut_slice().apply_impulse(handle, impulse, offset);
    }
}
