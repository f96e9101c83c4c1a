//! Sequential impulse contact solver.
//!
//! Solving is split into two stages that run once per step:
//!
//! 1. [`pre_solve`] refreshes contact offsets, effective masses and the
//!    Baumgarte bias, then optionally re-applies warm-start impulses.
//! 2. [`solve_velocity`] runs `iterations` Gauss-Seidel passes.
//!
//! # Iteration order
//!
//! Every pass visits manifolds in slice order, contacts in vector order, and
//! within a contact the normal axis before the tangent axis. Later contacts
//! read velocities already changed by earlier ones, so this order is part of
//! the result and is kept fixed for reproducibility.

use std::fmt::Debug;

use glam::Vec2;

use super::contact::{Contact, ContactManifold};
use super::error::SolverError;
use super::rigid_body::{BodySet, BodySnapshot};
use super::{RestitutionMode, SolverConfig};

/// Prepare every active manifold for the velocity passes.
///
/// Fails without touching anything if `config` is out of range, `dt` is not
/// a positive finite number or an active manifold references an unknown body.
pub fn pre_solve<H, S>(
    manifolds: &mut [ContactManifold<H>],
    bodies: &mut S,
    config: &SolverConfig,
    dt: f32,
) -> Result<(), SolverError>
where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    config.validate()?;
    check_timestep(dt)?;
    check_bodies(manifolds, bodies)?;

    let inv_dt = 1.0 / dt;

    for manifold in manifolds.iter_mut().filter(|m| m.active) {
        // Both handles resolve after check_bodies.
        let (Some(a), Some(b)) = (bodies.body(manifold.body_a), bodies.body(manifold.body_b))
        else {
            continue;
        };

        let normal = manifold.normal;
        let tangent = manifold.tangent;
        let contact_count = manifold.contacts.len() as f32;

        for contact in &mut manifold.contacts {
            contact.offset_a = contact.position - a.position;
            contact.offset_b = contact.position - b.position;

            let inv_mass_normal =
                effective_inverse_mass(manifold.inverse_mass, &a, &b, contact, normal);
            let inv_mass_tangent =
                effective_inverse_mass(manifold.inverse_mass, &a, &b, contact, tangent);

            contact.share_normal = share(inv_mass_normal);
            contact.share_tangent = share(inv_mass_tangent);
            if contact.share_normal == 0.0 {
                tracing::trace!(
                    body_a = ?manifold.body_a,
                    body_b = ?manifold.body_b,
                    "contact has zero effective mass along the normal"
                );
            }
            if config.normalize_by_contact_count {
                contact.share_normal /= contact_count;
                contact.share_tangent /= contact_count;
            }

            contact.bias = config.bias_factor * inv_dt * (contact.depth - config.slop).max(0.0);

            contact.restitution_bias = match config.restitution_mode {
                RestitutionMode::Scaled => 0.0,
                RestitutionMode::Classical => {
                    let relative =
                        b.velocity_at(contact.offset_b) - a.velocity_at(contact.offset_a);
                    manifold.restitution * normal.dot(relative).max(0.0)
                }
            };
        }

        if config.warm_starting {
            for contact in &manifold.contacts {
                let impulse = normal * contact.normal_impulse + tangent * contact.tangent_impulse;
                apply_pair(bodies, manifold.body_a, manifold.body_b, impulse, contact);
            }
        } else {
            for contact in &mut manifold.contacts {
                contact.normal_impulse = 0.0;
                contact.tangent_impulse = 0.0;
            }
        }
    }

    Ok(())
}

/// Run `config.iterations` velocity passes over every active manifold.
///
/// Fails without touching anything if `config` is out of range or an active
/// manifold references an unknown body.
pub fn solve_velocity<H, S>(
    manifolds: &mut [ContactManifold<H>],
    bodies: &mut S,
    config: &SolverConfig,
) -> Result<(), SolverError>
where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    config.validate()?;
    check_bodies(manifolds, bodies)?;

    for _ in 0..config.iterations {
        for manifold in manifolds.iter_mut().filter(|m| m.active) {
            solve_manifold(manifold, bodies, config.restitution_mode);
        }
    }

    Ok(())
}

fn solve_manifold<H, S>(
    manifold: &mut ContactManifold<H>,
    bodies: &mut S,
    mode: RestitutionMode,
) where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    let (body_a, body_b) = (manifold.body_a, manifold.body_b);
    let normal = manifold.normal;
    let tangent = manifold.tangent;

    // Callers run check_bodies first, so the early returns below never fire.
    for contact in &mut manifold.contacts {
        // Normal impulse
        let Some(relative) = relative_velocity(bodies, body_a, body_b, contact) else {
            return;
        };
        let relative_normal = normal.dot(relative);

        let lambda = match mode {
            RestitutionMode::Scaled => {
                manifold.restitution * (relative_normal + contact.bias) * contact.share_normal
            }
            RestitutionMode::Classical => {
                (relative_normal + contact.bias + contact.restitution_bias) * contact.share_normal
            }
        };

        let old_impulse = contact.normal_impulse;
        contact.normal_impulse = (old_impulse + lambda).max(0.0);
        let delta = contact.normal_impulse - old_impulse;
        apply_pair(bodies, body_a, body_b, normal * delta, contact);

        // Friction impulse, against the velocities left by the normal impulse
        let Some(relative) = relative_velocity(bodies, body_a, body_b, contact) else {
            return;
        };
        let lambda = tangent.dot(relative) * contact.share_tangent;

        // Coulomb friction: |Jt| <= mu * Jn
        let max_friction = manifold.friction.max(0.0) * contact.normal_impulse;
        let old_impulse = contact.tangent_impulse;
        contact.tangent_impulse = (old_impulse + lambda).clamp(-max_friction, max_friction);
        let delta = contact.tangent_impulse - old_impulse;
        apply_pair(bodies, body_a, body_b, tangent * delta, contact);
    }
}

/// `velocity_b - velocity_a` at the contact point.
fn relative_velocity<H, S>(
    bodies: &S,
    body_a: H,
    body_b: H,
    contact: &Contact,
) -> Option<Vec2>
where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    let a = bodies.body(body_a)?;
    let b = bodies.body(body_b)?;
    Some(b.velocity_at(contact.offset_b) - a.velocity_at(contact.offset_a))
}

/// Apply `impulse` to A and its negation to B, skipping immovable bodies.
fn apply_pair<H, S>(
    bodies: &mut S,
    body_a: H,
    body_b: H,
    impulse: Vec2,
    contact: &Contact,
) where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    if impulse == Vec2::ZERO {
        return;
    }
    if bodies.body(body_a).is_some_and(|a| !a.immovable) {
        bodies.apply_impulse(body_a, impulse, contact.offset_a);
    }
    if bodies.body(body_b).is_some_and(|b| !b.immovable) {
        bodies.apply_impulse(body_b, -impulse, contact.offset_b);
    }
}

/// `J M^-1 J^T` for one axis of one contact.
fn effective_inverse_mass(
    inverse_mass: f32,
    a: &BodySnapshot,
    b: &BodySnapshot,
    contact: &Contact,
    axis: Vec2,
) -> f32 {
    let ra = contact.offset_a.dot(axis);
    let rb = contact.offset_b.dot(axis);
    inverse_mass
        + a.inv_inertia * (contact.offset_a.length_squared() - ra * ra)
        + b.inv_inertia * (contact.offset_b.length_squared() - rb * rb)
}

/// Reciprocal of `inv_mass`, or zero when there is no finite mass to share.
fn share(inv_mass: f32) -> f32 {
    if inv_mass > 0.0 && inv_mass.is_finite() {
        1.0 / inv_mass
    } else {
        0.0
    }
}

pub(crate) fn check_timestep(dt: f32) -> Result<(), SolverError> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidTimestep(dt))
    }
}

/// First active manifold whose bodies are not all in `bodies`.
pub(crate) fn check_bodies<H, S>(
    manifolds: &[ContactManifold<H>],
    bodies: &S,
) -> Result<(), SolverError>
where
    H: Copy + Debug,
    S: BodySet<Handle = H> + ?Sized,
{
    for (index, manifold) in manifolds.iter().enumerate().filter(|(_, m)| m.active) {
        if bodies.body(manifold.body_a).is_none() || bodies.body(manifold.body_b).is_none() {
            return Err(SolverError::MissingBody { manifold: index });
        }
    }
    Ok(())
}
