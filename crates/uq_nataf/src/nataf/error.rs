//! Error types for the Nataf joint-distribution engine.

use thiserror::Error;

/// Errors from correlation-matrix validation and factorization.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CorrelationError {
    /// The flat entry buffer does not hold `dim * dim` values.
    #[error("Correlation matrix needs {expected} entries for dimension {dim}, got {got}")]
    InvalidSize {
        /// Declared dimension
        dim: usize,
        /// `dim * dim`
        expected: usize,
        /// Length of the supplied buffer
        got: usize,
    },

    /// An off-diagonal pair of entries disagrees.
    #[error("Correlation matrix is not symmetric at ({row}, {col})")]
    NotSymmetric {
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
    },

    /// A diagonal entry differs from one.
    #[error("Correlation matrix diagonal entry {index} is {value}, expected 1")]
    InvalidDiagonal {
        /// Index of the offending diagonal entry
        index: usize,
        /// Its value
        value: f64,
    },

    /// An entry lies outside `[-1, 1]` or is not finite.
    #[error("Correlation entry ({row}, {col}) = {value} is outside [-1, 1]")]
    OutOfRange {
        /// Row of the offending entry
        row: usize,
        /// Column of the offending entry
        col: usize,
        /// Its value
        value: f64,
    },

    /// Cholesky factorization hit a non-positive pivot.
    #[error("Correlation matrix is not positive definite (pivot {pivot})")]
    NotPositiveDefinite {
        /// Index of the failing pivot
        pivot: usize,
    },
}

/// Errors from constructing or evaluating a Nataf joint distribution.
///
/// # Examples
/// ```
/// use uq_nataf::marginal::Marginal;
/// use uq_nataf::nataf::{CorrelationMatrix, NatafError, NatafTransform};
///
/// let marginals = vec![Marginal::normal(0.0, 1.0).unwrap()];
/// let corr = CorrelationMatrix::identity(2);
/// let err = NatafTransform::new(marginals, corr).unwrap_err();
/// assert!(matches!(err, NatafError::DimensionMismatch { .. }));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NatafError {
    /// A marginal has a divergent mean or standard deviation, so its
    /// standardized transform is undefined.
    #[error("Marginal {index} ({family}) has non-finite mean or standard deviation")]
    NonFiniteMoments {
        /// Index of the offending marginal
        index: usize,
        /// Its family name
        family: &'static str,
    },

    /// A zero-variance marginal carries a nonzero correlation entry.
    #[error("Marginal {index} has zero variance but a nonzero correlation entry")]
    DegenerateCorrelation {
        /// Index of the offending marginal
        index: usize,
    },

    /// The physical correlation matrix failed validation.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// No equivalent standard-normal correlation could be found for a pair.
    #[error(
        "No equivalent normal correlation found for marginals {i} and {j} \
         (target correlation {rho})"
    )]
    UnsolvablePair {
        /// First marginal index
        i: usize,
        /// Second marginal index
        j: usize,
        /// Target physical correlation
        rho: f64,
    },

    /// The derived standard-normal correlation matrix is not positive
    /// definite, so no valid joint distribution exists.
    #[error("Transformed correlation matrix is not positive definite")]
    TransformedNotPositiveDefinite,

    /// The requested operation needs a continuous marginal.
    #[error("Marginal {index} is not continuous; {operation} is undefined for it")]
    NonContinuousMarginal {
        /// Index of the offending marginal
        index: usize,
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// A sample buffer is not a whole number of points, or a point has the
    /// wrong length.
    #[error("Expected a multiple of {expected} values, got {got}")]
    DimensionMismatch {
        /// Point dimension
        expected: usize,
        /// Length of the supplied buffer
        got: usize,
    },

    /// A point in physical space lies outside the support of its marginals.
    #[error("Sample component {index} = {value} is outside the marginal's support")]
    OutOfSupport {
        /// Component index
        index: usize,
        /// Offending value
        value: f64,
    },
}
