//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, the secant method, and inverse quadratic
/// interpolation. Guaranteed to converge for continuous functions with a
/// valid bracket, falling back to bisection whenever an interpolation step
/// would leave the bracket or make too little progress.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use uq_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket `[x1, x2]`.
    ///
    /// Requires `f(x1)` and `f(x2)` to have opposite signs.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root with `|f(x)| < tolerance` or bracket width below the
    ///   machine-scaled tolerance
    /// * `Err(SolverError::NoBracket)` - same sign at both endpoints
    /// * `Err(SolverError::MaxIterationsExceeded)` - no convergence
    pub fn find_root<F>(&self, f: F, x1: T, x2: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let half = T::from(0.5).unwrap();

        let mut a = x1;
        let mut b = x2;
        let mut c = x2;
        let mut fa = f(a);
        let mut fb = f(b);

        if (fa > T::zero() && fb > T::zero()) || (fa < T::zero() && fb < T::zero()) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            // Re-orient so the root stays bracketed by b and c.
            if (fb > T::zero() && fc > T::zero()) || (fb < T::zero() && fc < T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = two * T::epsilon() * b.abs() + half * self.config.tolerance;
            let xm = half * (c - b);

            if xm.abs() <= tol1 || fb == T::zero() || fb.abs() < self.config.tolerance {
                return Ok(b);
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                // Attempt inverse quadratic interpolation (secant when a == c).
                let s = fb / fa;
                let (mut p, mut q);
                if a == c {
                    p = two * xm * s;
                    q = T::one() - s;
                } else {
                    let qq = fa / fc;
                    let r = fb / fc;
                    p = s * (two * xm * qq * (qq - r) - (b - a) * (r - T::one()));
                    q = (qq - T::one()) * (r - T::one()) * (s - T::one());
                }
                if p > T::zero() {
                    q = -q;
                }
                p = p.abs();

                let min1 = three * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if two * p < min1.min(min2) {
                    // Interpolation accepted.
                    e = d;
                    d = p / q;
                } else {
                    // Interpolation would overstep; bisect.
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            if d.abs() > tol1 {
                b = b + d;
            } else {
                b = b + if xm >= T::zero() { tol1 } else { -tol1 };
            }
            fb = f(b);
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
