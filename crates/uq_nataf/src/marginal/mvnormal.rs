//! Dense multivariate normal distribution.

use rand::Rng;
use rand_distr::StandardNormal;

use super::DistributionError;

/// ln(2 * pi)
const LN_2PI: f64 = 1.837_877_066_409_345_3;

/// Multivariate normal distribution with a dense covariance matrix.
///
/// The covariance is factorized once at construction (`Sigma = L L^T` with
/// `L` lower triangular), so sampling and log-density evaluation are `O(d^2)`
/// per call. Matrices are stored flat in row-major order.
///
/// # Examples
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use uq_nataf::marginal::MultivariateNormal;
///
/// let mvn = MultivariateNormal::new(vec![0.0, 1.0], &[2.0, 0.5, 0.5, 1.0]).unwrap();
/// let mut rng = StdRng::seed_from_u64(3);
/// let draw = mvn.sample(&mut rng);
/// assert_eq!(draw.len(), 2);
/// let lp = mvn.log_pdf(&draw).unwrap();
/// assert!(lp.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct MultivariateNormal {
    mean: Vec<f64>,
    /// Lower Cholesky factor of the covariance, row-major d x d.
    factor: Vec<f64>,
    dim: usize,
    log_det: f64,
}

impl MultivariateNormal {
    /// Build from a mean vector and a flat row-major covariance matrix.
    ///
    /// The covariance must be square of matching dimension, symmetric, and
    /// positive definite.
    pub fn new(mean: Vec<f64>, covariance: &[f64]) -> Result<Self, DistributionError> {
        let dim = mean.len();
        if dim == 0 {
            return Err(DistributionError::invalid(
                "multivariate normal",
                "mean vector must not be empty".to_string(),
            ));
        }
        if covariance.len() != dim * dim {
            return Err(DistributionError::DimensionMismatch {
                expected: dim * dim,
                got: covariance.len(),
            });
        }
        if mean.iter().any(|m| !m.is_finite()) || covariance.iter().any(|c| !c.is_finite()) {
            return Err(DistributionError::invalid(
                "multivariate normal",
                "mean and covariance entries must be finite".to_string(),
            ));
        }
        for i in 0..dim {
            for j in (i + 1)..dim {
                let a = covariance[i * dim + j];
                let b = covariance[j * dim + i];
                if (a - b).abs() > 1e-10 * a.abs().max(b.abs()).max(1.0) {
                    return Err(DistributionError::invalid(
                        "multivariate normal",
                        format!("covariance is not symmetric at ({i}, {j})"),
                    ));
                }
            }
        }

        let factor = cholesky_lower(covariance, dim).ok_or_else(|| {
            DistributionError::invalid(
                "multivariate normal",
                "covariance is not positive definite".to_string(),
            )
        })?;
        let log_det = 2.0 * (0..dim).map(|i| factor[i * dim + i].ln()).sum::<f64>();

        Ok(Self {
            mean,
            factor,
            dim,
            log_det,
        })
    }

    /// Dimension of the distribution.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Mean vector.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Draw one sample as `mean + L z` with `z` i.i.d. standard normal.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let d = self.dim;
        let z: Vec<f64> = (0..d).map(|_| rng.sample(StandardNormal)).collect();
        let mut x = self.mean.clone();
        for i in 0..d {
            for (j, zj) in z.iter().enumerate().take(i + 1) {
                x[i] += self.factor[i * d + j] * zj;
            }
        }
        x
    }

    /// Draw `n` samples, returned flat row-major as `n x dim`.
    pub fn random<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let mut out = Vec::with_capacity(n * self.dim);
        for _ in 0..n {
            out.extend_from_slice(&self.sample(rng));
        }
        out
    }

    /// Log-density at `x`.
    ///
    /// `-(d/2) ln(2 pi) - (1/2) ln|Sigma| - (1/2)(x - mean)^T Sigma^{-1} (x - mean)`,
    /// with the quadratic form evaluated through a forward solve against the
    /// Cholesky factor.
    pub fn log_pdf(&self, x: &[f64]) -> Result<f64, DistributionError> {
        let d = self.dim;
        if x.len() != d {
            return Err(DistributionError::DimensionMismatch {
                expected: d,
                got: x.len(),
            });
        }

        // Solve L y = x - mean; the quadratic form is then |y|^2.
        let mut y = vec![0.0; d];
        for i in 0..d {
            let mut s = x[i] - self.mean[i];
            for j in 0..i {
                s -= self.factor[i * d + j] * y[j];
            }
            y[i] = s / self.factor[i * d + i];
        }
        let quad: f64 = y.iter().map(|v| v * v).sum();

        Ok(-0.5 * (d as f64 * LN_2PI + self.log_det + quad))
    }

    /// Density at `x`.
    pub fn pdf(&self, x: &[f64]) -> Result<f64, DistributionError> {
        Ok(self.log_pdf(x)?.exp())
    }
}

/// Lower Cholesky factorization of a flat row-major matrix, or `None` when
/// a non-positive pivot shows the matrix is not positive definite.
fn cholesky_lower(matrix: &[f64], dim: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0; dim * dim];
    for i in 0..dim {
        for j in 0..=i {
            let mut s = matrix[i * dim + j];
            for k in 0..j {
                s -= l[i * dim + k] * l[j * dim + k];
            }
            if i == j {
                if s <= 0.0 {
                    return None;
                }
                l[i * dim + j] = s.sqrt();
            } else {
                l[i * dim + j] = s / l[j * dim + j];
            }
        }
    }
    Some(l)
}
