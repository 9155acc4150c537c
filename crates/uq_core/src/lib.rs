//! # uq_core: Numerical Foundation for the Nataf Transformation Library
//!
//! Bottom layer of the two-crate workspace, providing:
//! - Root-finding solvers: `BrentSolver`, `SecantSolver` (`math::solvers`)
//! - Special functions: error function family, regularized incomplete
//!   gamma/beta and their inverses, standard-normal pdf/cdf/quantile
//!   (`math::special`)
//! - Gauss-Legendre quadrature rule generation (`math::quadrature`)
//! - Error types: `SolverError`, `SpecialError` (`types::error`)
//!
//! This crate has no dependency on the model layer (`uq_nataf`) and minimal
//! external dependencies:
//! - num-traits: traits for generic numerical computation
//! - thiserror: structured error types
//!
//! ## Usage Examples
//!
//! ```rust
//! use uq_core::math::solvers::{BrentSolver, SolverConfig};
//! use uq_core::math::special::norm_cdf;
//!
//! // Root finding
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//!
//! // Special functions
//! assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
