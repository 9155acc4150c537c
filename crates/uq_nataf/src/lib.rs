//! # uq_nataf: Marginal Distributions and the Nataf Joint Engine
//!
//! Probabilistic model layer for uncertainty-quantification workflows.
//! This crate provides:
//! - A library of parametric marginal distributions (`marginal`) exposing
//!   sampling, density, log-density, CDF and quantile evaluation
//! - The Nataf joint-distribution engine (`nataf`): given marginals and a
//!   physical correlation matrix it derives the equivalent standard-normal
//!   correlation matrix, factorizes it once, and offers forward/inverse
//!   transforms, joint density/CDF evaluation, and joint sampling
//!
//! ## Spaces
//!
//! - **Physical space (X)**: correlated variables with their true marginals
//! - **Standard-normal space (U)**: independent zero-mean unit-variance
//!   normals, the computational substrate for the transformation
//!
//! ## Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use uq_nataf::marginal::Marginal;
//! use uq_nataf::nataf::{CorrelationMatrix, NatafTransform};
//!
//! let marginals = vec![
//!     Marginal::normal(0.0, 1.0).unwrap(),
//!     Marginal::lognormal(0.0, 1.0).unwrap(),
//! ];
//! let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
//! let joint = NatafTransform::new(marginals, corr).unwrap();
//!
//! // Round trip through standard-normal space.
//! let x = [0.3, 1.2];
//! let u = joint.x2u(&x).unwrap();
//! let back = joint.u2x(&u).unwrap();
//! assert!((back[0] - x[0]).abs() < 1e-8);
//! assert!((back[1] - x[1]).abs() < 1e-8);
//!
//! // Joint sampling.
//! let mut rng = StdRng::seed_from_u64(42);
//! let draws = joint.random(1000, &mut rng);
//! assert_eq!(draws.len(), 2000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod marginal;
pub mod nataf;
