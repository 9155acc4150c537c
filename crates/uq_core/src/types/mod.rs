//! Shared types for the numerical foundation layer.

mod error;

pub use error::{SolverError, SpecialError};
