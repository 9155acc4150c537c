//! Secant-method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Unconstrained derivative-free root finder.
///
/// Starts from a single initial guess and iterates
/// `x_{n+1} = x_n - f(x_n) * (x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))`.
/// Unlike [`super::BrentSolver`] no bracket is required, at the cost of
/// losing the convergence guarantee; callers are expected to retry from
/// different seeds when a search fails.
///
/// # Example
///
/// ```
/// use uq_core::math::solvers::SecantSolver;
///
/// let solver = SecantSolver::with_defaults();
/// let f = |x: f64| x * x - 2.0;
/// let root = solver.find_root(f, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SecantSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> SecantSolver<T> {
    /// Create a new secant solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` starting from the initial guess `x0`.
    ///
    /// The second point of the initial secant is obtained by perturbing the
    /// guess by a small relative step.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root with `|f(x)| < tolerance`
    /// * `Err(SolverError::FlatFunction)` - the secant slope vanished
    /// * `Err(SolverError::NumericalInstability)` - non-finite iterate
    /// * `Err(SolverError::MaxIterationsExceeded)` - no convergence
    pub fn find_root<F>(&self, f: F, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut x_prev = x0;
        let mut f_prev = f(x_prev);
        if f_prev.abs() < self.config.tolerance {
            return Ok(x_prev);
        }

        // Relative perturbation to start the secant; absolute floor keeps it
        // nonzero at x0 = 0.
        let step = T::from(1e-4).unwrap();
        let mut x = x_prev + step * (T::one() + x_prev.abs());
        let mut fx = f(x);

        for _ in 0..self.config.max_iterations {
            if fx.abs() < self.config.tolerance {
                return Ok(x);
            }

            let slope = fx - f_prev;
            if slope.abs() < T::from(1e-30).unwrap() {
                return Err(SolverError::FlatFunction {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            let x_next = x - fx * (x - x_prev) / slope;
            if !x_next.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "secant iteration produced non-finite value".to_string(),
                ));
            }

            x_prev = x;
            f_prev = fx;
            x = x_next;
            fx = f(x);
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
