//! Solver configuration types.

use num_traits::Float;

/// Configuration shared by all root-finding algorithms.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use uq_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
///
/// let custom = SolverConfig { tolerance: 1e-12, max_iterations: 200 };
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance; the solver stops when `|f(x)| < tolerance`.
    pub tolerance: T,

    /// Maximum number of iterations before giving up with
    /// `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default configuration: `tolerance = 1e-10`, `max_iterations = 100`.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }
}
