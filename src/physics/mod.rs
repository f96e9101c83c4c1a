//! 2D contact resolution with a sequential impulse solver.
//!
//! # Architecture
//!
//! Collision detection hands over a list of [`ContactManifold`]s once per
//! step. [`ContactSolver::step`] then:
//!
//! 1. Warm-starts contacts from the previous step (optional)
//! 2. Prepares constraints: offsets, effective masses, Baumgarte bias
//! 3. Solves velocities (sequential impulse, fixed iteration count)
//! 4. Stores accumulated impulses for the next step (optional)
//!
//! Integration and sleeping stay with the caller; the solver only changes
//! body velocities through [`BodySet`].

pub mod contact;
pub mod error;
pub mod rigid_body;
pub mod solver;

pub use self::contact::{Contact, ContactCache, ContactManifold};
pub use self::error::SolverError;
pub use self::rigid_body::{BodySet, BodySnapshot, RigidBody, RigidBodyType, SleepState};

/// How the manifold restitution enters the normal impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestitutionMode {
    /// `restitution * (relative_normal + bias) * share_normal`.
    ///
    /// Restitution scales the whole normal term, bias included, and acts as a
    /// relaxation factor: contacts settle at rest rather than bounce.
    #[default]
    Scaled,
    /// `(relative_normal + bias + restitution * approach_speed) * share_normal`.
    ///
    /// The approach speed is sampled once in pre-solve, so converged contacts
    /// separate at `restitution` times the speed they arrived with.
    Classical,
}

/// Configuration for the contact solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Number of velocity passes per step. Default: 20.
    pub iterations: u32,
    /// Penetration allowed before bias kicks in. Default: 0.02.
    pub slop: f32,
    /// Baumgarte stabilization factor in `[0, 1]`. Default: 0.2.
    pub bias_factor: f32,
    /// Re-apply accumulated impulses before iterating. Default: false.
    pub warm_starting: bool,
    /// Divide effective masses by the manifold's contact count. Default: false.
    pub normalize_by_contact_count: bool,
    /// Default: [`RestitutionMode::Scaled`].
    pub restitution_mode: RestitutionMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 20,
            slop: 0.02,
            bias_factor: 0.2,
            warm_starting: false,
            normalize_by_contact_count: false,
            restitution_mode: RestitutionMode::Scaled,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.iterations == 0 {
            return Err(SolverError::ZeroIterations);
        }
        if !(0.0..=1.0).contains(&self.bias_factor) {
            return Err(SolverError::BiasFactorOutOfRange(self.bias_factor));
        }
        if !(self.slop >= 0.0 && self.slop.is_finite()) {
            return Err(SolverError::InvalidSlop(self.slop));
        }
        Ok(())
    }
}

/// Runs one contact-resolution step per call and owns the warm-start cache.
#[derive(Debug)]
pub struct ContactSolver<H> {
    config: SolverConfig,
    contact_cache: ContactCache<H>,
}

impl<H> ContactSolver<H>
where
    H: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    /// Create a solver. The configuration is fixed for its lifetime.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            config,
            contact_cache: ContactCache::new(),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Impulses carried over from the last step when warm starting.
    pub fn contact_cache(&self) -> &ContactCache<H> {
        &self.contact_cache
    }

    /// Forget impulses carried over from earlier steps.
    pub fn clear_cache(&mut self) {
        self.contact_cache.clear();
    }

    /// Resolve `manifolds` against `bodies` for a step of length `dt`.
    ///
    /// On error nothing is mutated and the cache keeps its previous contents.
    pub fn step<S>(
        &mut self,
        manifolds: &mut [ContactManifold<H>],
        bodies: &mut S,
        dt: f32,
    ) -> Result<(), SolverError>
    where
        S: BodySet<Handle = H> + ?Sized,
    {
        tracing::debug!(
            manifolds = manifolds.len(),
            contacts = manifolds.iter().map(|m| m.contacts.len()).sum::<usize>(),
            dt,
            "contact solver step"
        );

        // Reject bad input before the cache writes into the manifolds.
        if let Err(err) =
            solver::check_timestep(dt).and_then(|()| solver::check_bodies(manifolds, bodies))
        {
            tracing::warn!(%err, "rejected contact solver step");
            return Err(err);
        }

        if self.config.warm_starting {
            self.contact_cache.warm_start(manifolds);
        }

        if let Err(err) = solver::pre_solve(manifolds, bodies, &self.config, dt) {
            tracing::warn!(%err, "rejected contact solver step");
            return Err(err);
        }
        solver::solve_velocity(manifolds, bodies, &self.config)?;

        if self.config.warm_starting {
            self.contact_cache.update(manifolds);
        }
        Ok(())
    }
}
