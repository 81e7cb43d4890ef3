//! Failure taxonomy for a dispatch solve.

use thiserror::Error;

/// Why a dispatch plan could not be produced.
///
/// A failed solve never yields a partial plan, and retrying with the same
/// scenario gives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizationError {
    /// The scenario violates a precondition; no LP was built.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    /// The solver proved the constraint set has no feasible point.
    #[error("the dispatch problem is infeasible")]
    Infeasible,
    /// The objective can decrease without bound.
    #[error("the dispatch problem is unbounded")]
    Unbounded,
    /// Any other non-optimal solver termination.
    #[error("solver failure: {0}")]
    SolverFailure(String),
}
