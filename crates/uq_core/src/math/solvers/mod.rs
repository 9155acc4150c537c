//! Root-finding solvers for the Nataf integral equation and marginal
//! quantile inversion.
//!
//! ## Available Solvers
//!
//! - [`BrentSolver`]: robust bracketing method without derivative requirement
//! - [`SecantSolver`]: unconstrained derivative-free iteration, used as the
//!   fallback when no valid bracket exists
//!
//! Both are configured through [`SolverConfig`]:
//! - `tolerance`: convergence tolerance (default: 1e-10)
//! - `max_iterations`: maximum iteration count (default: 100)
//!
//! ## Examples
//!
//! ```
//! use uq_core::math::solvers::{BrentSolver, SecantSolver, SolverConfig};
//!
//! let f = |x: f64| x * x * x - x - 2.0;
//!
//! // Bracketed search
//! let brent = BrentSolver::new(SolverConfig::default());
//! let root = brent.find_root(f, 1.0, 2.0).unwrap();
//! assert!(f(root).abs() < 1e-9);
//!
//! // Unconstrained search from an initial guess
//! let secant = SecantSolver::with_defaults();
//! let root = secant.find_root(f, 1.5).unwrap();
//! assert!(f(root).abs() < 1e-9);
//! ```

mod brent;
mod config;
mod secant;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use secant::SecantSolver;
