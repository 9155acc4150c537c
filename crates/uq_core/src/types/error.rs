//! Error types for structured error handling.
//!
//! This module provides:
//! - `SolverError`: Errors from root-finding solvers
//! - `SpecialError`: Errors from special-function evaluation

use thiserror::Error;

/// Root-finding solver errors.
///
/// # Variants
/// - `NoBracket`: the supplied interval does not bracket a sign change
/// - `MaxIterationsExceeded`: no convergence within the iteration budget
/// - `FlatFunction`: successive iterates produced an (almost) zero secant
///   slope, so no further progress is possible
/// - `NumericalInstability`: the iteration produced a non-finite iterate
///
/// # Examples
/// ```
/// use uq_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The function has the same sign at both bracket endpoints.
    #[error("No sign change in bracket [{a}, {b}]")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Solver failed to converge within the maximum iteration count.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Secant slope (or derivative) vanished at the current iterate.
    #[error("Function is locally flat at x = {x}")]
    FlatFunction {
        /// Iterate at which progress stalled
        x: f64,
    },

    /// The iteration produced a non-finite value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Special-function evaluation errors.
///
/// # Variants
/// - `DomainError`: argument outside the function's domain
/// - `ConvergenceFailure`: series or continued fraction did not converge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecialError {
    /// Argument outside the function's domain.
    #[error("Argument outside the function domain")]
    DomainError,

    /// Series expansion or continued fraction failed to converge.
    #[error("Series or continued fraction failed to converge")]
    ConvergenceFailure,
}
