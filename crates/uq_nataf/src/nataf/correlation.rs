//! Validated correlation matrices and their Cholesky factors.

use super::error::CorrelationError;

/// A validated correlation matrix, stored flat in row-major order.
///
/// Construction checks shape, symmetry, a unit diagonal, and that every
/// entry lies in `[-1, 1]`. Positive definiteness is checked separately by
/// [`CorrelationMatrix::cholesky`], since the Nataf engine needs to report
/// that failure differently for the physical and the transformed matrix.
///
/// # Examples
/// ```
/// use uq_nataf::nataf::CorrelationMatrix;
///
/// let corr = CorrelationMatrix::new(&[1.0, 0.3, 0.3, 1.0], 2).unwrap();
/// assert_eq!(corr.get(0, 1), 0.3);
/// let factor = corr.cholesky().unwrap();
/// assert!((factor.get(1, 1) - (1.0 - 0.09_f64).sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    data: Vec<f64>,
    dim: usize,
}

impl CorrelationMatrix {
    /// Symmetry tolerance, absolute.
    const SYMMETRY_TOL: f64 = 1e-10;

    /// Build from a flat row-major `dim x dim` buffer.
    pub fn new(entries: &[f64], dim: usize) -> Result<Self, CorrelationError> {
        if entries.len() != dim * dim || dim == 0 {
            return Err(CorrelationError::InvalidSize {
                dim,
                expected: dim * dim,
                got: entries.len(),
            });
        }
        for i in 0..dim {
            let diag = entries[i * dim + i];
            if (diag - 1.0).abs() > Self::SYMMETRY_TOL {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag,
                });
            }
            for j in 0..dim {
                let v = entries[i * dim + j];
                if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
                    return Err(CorrelationError::OutOfRange {
                        row: i,
                        col: j,
                        value: v,
                    });
                }
                if j > i && (v - entries[j * dim + i]).abs() > Self::SYMMETRY_TOL {
                    return Err(CorrelationError::NotSymmetric { row: i, col: j });
                }
            }
        }
        Ok(Self {
            data: entries.to_vec(),
            dim,
        })
    }

    /// The `dim x dim` identity, i.e. uncorrelated components.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.dim && col < self.dim, "index out of bounds");
        self.data[row * self.dim + col]
    }

    /// Flat row-major view of the entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// `true` when every off-diagonal entry is exactly zero.
    pub fn is_identity(&self) -> bool {
        (0..self.dim).all(|i| {
            (0..self.dim).all(|j| i == j || self.data[i * self.dim + j] == 0.0)
        })
    }

    /// Lower Cholesky factorization.
    ///
    /// Fails with [`CorrelationError::NotPositiveDefinite`] when a pivot is
    /// not strictly positive, which also catches perfectly correlated
    /// (singular) matrices.
    pub fn cholesky(&self) -> Result<CholeskyFactor, CorrelationError> {
        let d = self.dim;
        let mut l = vec![0.0; d * d];
        for i in 0..d {
            for j in 0..=i {
                let mut s = self.data[i * d + j];
                for k in 0..j {
                    s -= l[i * d + k] * l[j * d + k];
                }
                if i == j {
                    if s <= 0.0 {
                        return Err(CorrelationError::NotPositiveDefinite { pivot: i });
                    }
                    l[i * d + j] = s.sqrt();
                } else {
                    l[i * d + j] = s / l[j * d + j];
                }
            }
        }
        Ok(CholeskyFactor { data: l, dim: d })
    }
}

/// Lower-triangular Cholesky factor `L` with `L L^T` equal to the source
/// correlation matrix. Stored flat in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
    data: Vec<f64>,
    dim: usize,
}

impl CholeskyFactor {
    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at `(row, col)`; zero above the diagonal.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.dim && col < self.dim, "index out of bounds");
        self.data[row * self.dim + col]
    }

    /// Flat row-major view of the factor.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Compute `L v`, correlating a vector of independent coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != dim`.
    pub fn transform(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.dim, "vector length must match dimension");
        let d = self.dim;
        (0..d)
            .map(|i| (0..=i).map(|j| self.data[i * d + j] * v[j]).sum())
            .collect()
    }

    /// Solve `L y = v` by forward substitution, decorrelating a vector.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != dim`.
    pub fn solve_lower(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.dim, "vector length must match dimension");
        let d = self.dim;
        let mut y = vec![0.0; d];
        for i in 0..d {
            let mut s = v[i];
            for j in 0..i {
                s -= self.data[i * d + j] * y[j];
            }
            y[i] = s / self.data[i * d + i];
        }
        y
    }

    /// Log-determinant of the factored matrix, `2 sum ln L_ii`.
    pub fn log_determinant(&self) -> f64 {
        (0..self.dim)
            .map(|i| self.data[i * self.dim + i].ln())
            .sum::<f64>()
            * 2.0
    }
}
