//! Contact data structures for collision response.

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;

/// A single contact point with its solver state.
///
/// Created by collision detection with only `position` and `depth` filled in.
/// The remaining fields are written by [`pre_solve`](super::solver::pre_solve)
/// and [`solve_velocity`](super::solver::solve_velocity).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contact {
    /// Contact position in world space.
    pub position: Vec2,
    /// Penetration depth along the manifold normal.
    pub depth: f32,
    /// Offset from body A's center of mass to `position`.
    pub offset_a: Vec2,
    /// Offset from body B's center of mass to `position`.
    pub offset_b: Vec2,
    /// Reciprocal of the effective inverse mass along the normal.
    pub share_normal: f32,
    /// Reciprocal of the effective inverse mass along the tangent.
    pub share_tangent: f32,
    /// Accumulated normal impulse. Never negative.
    pub normal_impulse: f32,
    /// Accumulated friction impulse.
    pub tangent_impulse: f32,
    /// Baumgarte velocity bias.
    pub bias: f32,
    /// Approach speed to reverse, used by [`RestitutionMode::Classical`](super::RestitutionMode::Classical).
    pub restitution_bias: f32,
}

impl Contact {
    pub fn new(position: Vec2, depth: f32) -> Self {
        Self {
            position,
            depth,
            ..Default::default()
        }
    }
}

/// A collection of contact points between two bodies sharing one normal.
///
/// `normal` points from body B toward body A, so a positive
/// `normal.dot(velocity_b - velocity_a)` means the bodies are approaching.
#[derive(Debug, Clone)]
pub struct ContactManifold<H> {
    pub body_a: H,
    pub body_b: H,
    /// Contact normal (from B to A).
    pub normal: Vec2,
    /// Unit tangent orthogonal to `normal`.
    pub tangent: Vec2,
    /// Sum of both bodies' inverse masses.
    pub inverse_mass: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Inactive manifolds are ignored by every solver stage.
    pub active: bool,
    pub contacts: Vec<Contact>,
}

impl<H> ContactManifold<H> {
    /// Create an active manifold with no contacts, zero restitution and zero friction.
    ///
    /// The tangent is the normal rotated a quarter turn counter-clockwise.
    pub fn new(body_a: H, body_b: H, normal: Vec2, inverse_mass: f32) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            tangent: normal.perp(),
            inverse_mass,
            restitution: 0.0,
            friction: 0.0,
            active: true,
            contacts: Vec::new(),
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }
}

/// Cached contact data for warm-starting the solver.
#[derive(Debug, Clone, Copy)]
struct CachedContact {
    /// Contact position in world space (used for matching).
    position: Vec2,
    /// Accumulated normal impulse from the previous step.
    normal_impulse: f32,
    /// Accumulated tangent impulse from the previous step.
    tangent_impulse: f32,
}

/// Maximum distance squared for matching contacts across steps.
const CONTACT_MATCH_THRESHOLD_SQ: f32 = 0.02 * 0.02;

/// Cache of contact impulses for warm-starting the constraint solver.
///
/// Stores accumulated impulses from the previous step keyed by body pair.
/// On each new step, fresh contacts are matched against cached contacts
/// by position proximity and inherit the matching impulses, which the
/// pre-solve stage then re-applies before the solver iterates.
///
/// Pairs are keyed in manifold order: `(a, b)` and `(b, a)` are different
/// entries since the normal, and with it the impulse sign, flips.
#[derive(Debug)]
pub struct ContactCache<H> {
    cache: HashMap<(H, H), Vec<CachedContact>>,
}

impl<H> Default for ContactCache<H> {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> ContactCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy cached impulses onto the current manifolds' contacts.
    ///
    /// Contacts without a cached neighbour within the match threshold are
    /// left untouched.
    pub fn warm_start(&self, manifolds: &mut [ContactManifold<H>]) {
        for manifold in manifolds.iter_mut().filter(|m| m.active) {
            let Some(cached) = self.cache.get(&(manifold.body_a, manifold.body_b)) else {
                continue;
            };
            for contact in &mut manifold.contacts {
                let nearest = cached.iter().min_by(|a, b| {
                    let da = a.position.distance_squared(contact.position);
                    let db = b.position.distance_squared(contact.position);
                    da.total_cmp(&db)
                });
                if let Some(cc) = nearest {
                    if cc.position.distance_squared(contact.position) < CONTACT_MATCH_THRESHOLD_SQ {
                        contact.normal_impulse = cc.normal_impulse;
                        contact.tangent_impulse = cc.tangent_impulse;
                    }
                }
            }
        }
    }

    /// Replace the cache with the current step's solved contacts.
    pub fn update(&mut self, manifolds: &[ContactManifold<H>]) {
        self.cache.clear();
        for manifold in manifolds.iter().filter(|m| m.active) {
            let contacts = manifold
                .contacts
                .iter()
                .map(|c| CachedContact {
                    position: c.position,
                    normal_impulse: c.normal_impulse,
                    tangent_impulse: c.tangent_impulse,
                })
                .collect();
            self.cache
                .insert((manifold.body_a, manifold.body_b), contacts);
        }
    }

    /// Number of cached body pairs.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_manifold(a: usize, b: usize, position: Vec2, impulse: f32) -> ContactManifold<usize> {
        let mut contact = Contact::new(position, 0.01);
        contact.normal_impulse = impulse;
        contact.tangent_impulse = -0.5 * impulse;
        ContactManifold::new(a, b, Vec2::Y, 1.0).with_contact(contact)
    }

    #[test]
    fn test_contact_new_zeroes_solver_state() {
        let c = Contact::new(Vec2::new(1.0, 2.0), 0.1);
        assert_eq!(c.position, Vec2::new(1.0, 2.0));
        assert_eq!(c.depth, 0.1);
        assert_eq!(c.normal_impulse, 0.0);
        assert_eq!(c.tangent_impulse, 0.0);
        assert_eq!(c.share_normal, 0.0);
        assert_eq!(c.bias, 0.0);
    }

    #[test]
    fn test_manifold_tangent_is_perpendicular() {
        let normal = Vec2::new(3.0, 4.0).normalize();
        let m = ContactManifold::new(0usize, 1usize, normal, 2.0);
        assert!(m.tangent.dot(normal).abs() < 1e-6);
        assert!((m.tangent.length() - 1.0).abs() < 1e-6);
        assert!(m.active);
    }

    #[test]
    fn test_warm_start_copies_matching_impulses() {
        let mut cache = ContactCache::new();
        cache.update(&[solved_manifold(0, 1, Vec2::ZERO, 2.0)]);
        assert_eq!(cache.len(), 1);

        let mut next = vec![ContactManifold::new(0usize, 1usize, Vec2::Y, 1.0)
            .with_contact(Contact::new(Vec2::new(0.005, 0.0), 0.01))];
        cache.warm_start(&mut next);

        assert_eq!(next[0].contacts[0].normal_impulse, 2.0);
        assert_eq!(next[0].contacts[0].tangent_impulse, -1.0);
    }

    #[test]
    fn test_warm_start_ignores_distant_contacts() {
        let mut cache = ContactCache::new();
        cache.update(&[solved_manifold(0, 1, Vec2::ZERO, 2.0)]);

        let mut next = vec![ContactManifold::new(0usize, 1usize, Vec2::Y, 1.0)
            .with_contact(Contact::new(Vec2::new(0.5, 0.0), 0.01))];
        cache.warm_start(&mut next);

        assert_eq!(next[0].contacts[0].normal_impulse, 0.0);
    }

    #[test]
    fn test_warm_start_respects_pair_order() {
        let mut cache = ContactCache::new();
        cache.update(&[solved_manifold(0, 1, Vec2::ZERO, 2.0)]);

        let mut swapped = vec![ContactManifold::new(1usize, 0usize, -Vec2::Y, 1.0)
            .with_contact(Contact::new(Vec2::ZERO, 0.01))];
        cache.warm_start(&mut swapped);

        assert_eq!(swapped[0].contacts[0].normal_impulse, 0.0);
    }

    #[test]
    fn test_update_skips_inactive_and_replaces() {
        let mut cache = ContactCache::new();
        cache.update(&[solved_manifold(0, 1, Vec2::ZERO, 2.0)]);

        let mut inactive = solved_manifold(2, 3, Vec2::ZERO, 1.0);
        inactive.active = false;
        cache.update(&[inactive]);

        assert!(cache.is_empty());
    }
}
