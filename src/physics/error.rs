//! Errors reported by the contact solver.

use thiserror::Error;

/// Caller contract violations detected by the solver.
///
/// None of these are transient: each one means the caller handed the solver
/// input it cannot give a meaningful answer for.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolverError {
    /// The timestep was zero, negative, or not finite.
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    /// The solver was configured to run no velocity passes.
    #[error("solver iterations must be at least 1")]
    ZeroIterations,
    /// The Baumgarte factor was outside `[0, 1]`.
    #[error("bias factor must be within [0, 1], got {0}")]
    BiasFactorOutOfRange(f32),
    /// The penetration slop was negative or not finite.
    #[error("penetration slop must be non-negative and finite, got {0}")]
    InvalidSlop(f32),
    /// An active manifold references a body the body set cannot resolve.
    #[error("manifold {manifold} references a body missing from the body set")]
    MissingBody { manifold: usize },
}
