//! The Nataf joint-distribution engine.
//!
//! A joint distribution is specified by a vector of [`crate::marginal::Marginal`]
//! distributions together with a [`CorrelationMatrix`] in physical space.
//! Construction of a [`NatafTransform`] derives the equivalent
//! standard-normal correlation matrix by solving one scalar integral
//! equation per correlated pair, factorizes it, and then serves transforms,
//! densities, CDFs and sampling from that single factorization.

mod correlation;
mod engine;
mod error;
mod mvncdf;
mod solver;

pub use correlation::{CholeskyFactor, CorrelationMatrix};
pub use engine::NatafTransform;
pub use error::{CorrelationError, NatafError};
