//! Error types for marginal-distribution construction.

use thiserror::Error;

/// Errors raised when constructing a distribution object.
///
/// Parameter consistency is checked at construction, not at first use, so a
/// successfully constructed distribution can always be evaluated.
///
/// # Examples
/// ```
/// use uq_nataf::marginal::Marginal;
///
/// let err = Marginal::uniform(2.0, 1.0).unwrap_err();
/// assert!(format!("{}", err).contains("uniform"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DistributionError {
    /// A family's defining parameters are mutually inconsistent.
    #[error("Invalid parameter for {family} distribution: {message}")]
    InvalidParameter {
        /// Distribution family name
        family: &'static str,
        /// What was wrong with the parameters
        message: String,
    },

    /// A vector argument does not match the distribution's dimension.
    #[error("Dimension mismatch: expected {expected} components, got {got}")]
    DimensionMismatch {
        /// Dimension the distribution was built with
        expected: usize,
        /// Length of the offending argument
        got: usize,
    },
}

impl DistributionError {
    /// Shorthand used by the family constructors.
    pub(crate) fn invalid(family: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            family,
            message: message.into(),
        }
    }
}
