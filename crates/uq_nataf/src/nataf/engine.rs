//! The Nataf joint-distribution engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use tracing::{debug, info};
use uq_core::math::special::{norm_icdf, norm_pdf};

use super::correlation::{CholeskyFactor, CorrelationMatrix};
use super::error::NatafError;
use super::{mvncdf, solver};
use crate::marginal::Marginal;

/// ln(2 * pi)
const LN_2PI: f64 = 1.837_877_066_409_345_3;

/// Monte-Carlo sample count for [`NatafTransform::cdf`].
const DEFAULT_CDF_SAMPLES: usize = 100_000;

/// Seed for the default CDF estimator, so repeated evaluations agree.
const DEFAULT_CDF_SEED: u64 = 7919;

/// A joint distribution defined by marginals and a physical correlation
/// matrix, mediated by a Gaussian copula.
///
/// Construction derives the equivalent standard-normal correlation matrix
/// (solving one scalar integral equation per correlated pair of marginals)
/// and factorizes it once. All subsequent operations reuse that factor:
///
/// - [`x2u`](Self::x2u) / [`u2x`](Self::u2x): map between physical space and
///   independent standard-normal space, with Jacobian variants for
///   reliability and optimization workflows
/// - [`pdf`](Self::pdf) / [`cdf`](Self::cdf): joint density and joint CDF
/// - [`random`](Self::random): joint sampling
///
/// Sample buffers are flat row-major `n x d` slices; results come back in
/// the same layout.
///
/// # Examples
/// ```
/// use uq_nataf::marginal::Marginal;
/// use uq_nataf::nataf::{CorrelationMatrix, NatafTransform};
///
/// let marginals = vec![
///     Marginal::gamma(2.0, 1.0).unwrap(),
///     Marginal::uniform(0.0, 1.0).unwrap(),
/// ];
/// let corr = CorrelationMatrix::new(&[1.0, 0.4, 0.4, 1.0], 2).unwrap();
/// let joint = NatafTransform::new(marginals, corr).unwrap();
///
/// // Two points at once, flat row-major.
/// let u = joint.x2u(&[1.0, 0.5, 3.0, 0.9]).unwrap();
/// assert_eq!(u.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct NatafTransform {
    marginals: Vec<Marginal>,
    rho_x: CorrelationMatrix,
    rho_z: CorrelationMatrix,
    factor: CholeskyFactor,
    cdf_samples: usize,
    cdf_seed: u64,
}

impl NatafTransform {
    /// Build the joint distribution from marginals and their physical
    /// correlation matrix.
    ///
    /// Fails when dimensions disagree, a marginal has divergent moments, a
    /// zero-variance marginal is correlated with anything, either
    /// correlation matrix is not positive definite, or some pair admits no
    /// equivalent normal correlation.
    pub fn new(
        marginals: Vec<Marginal>,
        rho_x: CorrelationMatrix,
    ) -> Result<Self, NatafError> {
        let d = marginals.len();
        if d == 0 || rho_x.dim() != d {
            return Err(NatafError::DimensionMismatch {
                expected: d.max(1),
                got: rho_x.dim(),
            });
        }

        for (i, m) in marginals.iter().enumerate() {
            if !m.mean().is_finite() || !m.std_dev().is_finite() {
                return Err(NatafError::NonFiniteMoments {
                    index: i,
                    family: m.family(),
                });
            }
            if m.std_dev() == 0.0 {
                let correlated = (0..d).any(|j| j != i && rho_x.get(i, j) != 0.0);
                if correlated {
                    return Err(NatafError::DegenerateCorrelation { index: i });
                }
            }
        }

        // The physical matrix itself must describe a feasible correlation
        // structure before any pair is solved.
        rho_x.cholesky()?;

        let rho_z = if rho_x.is_identity() {
            CorrelationMatrix::identity(d)
        } else {
            let pairs: Vec<(usize, usize)> = (0..d)
                .flat_map(|i| ((i + 1)..d).map(move |j| (i, j)))
                .filter(|&(i, j)| rho_x.get(i, j) != 0.0)
                .collect();
            debug!(dim = d, pairs = pairs.len(), "solving equivalent correlations");

            let solved: Result<Vec<(usize, usize, f64)>, NatafError> = pairs
                .par_iter()
                .map(|&(i, j)| {
                    let rho = rho_x.get(i, j);
                    solver::equivalent_correlation(
                        &marginals[i],
                        &marginals[j],
                        rho,
                        pair_seed(i, j),
                    )
                    .map(|r| (i, j, r))
                    .ok_or(NatafError::UnsolvablePair { i, j, rho })
                })
                .collect();

            let mut data = CorrelationMatrix::identity(d).as_slice().to_vec();
            for (i, j, r) in solved? {
                data[i * d + j] = r;
                data[j * d + i] = r;
            }
            CorrelationMatrix::new(&data, d)?
        };

        let factor = rho_z
            .cholesky()
            .map_err(|_| NatafError::TransformedNotPositiveDefinite)?;

        info!(dim = d, "constructed Nataf transform");
        Ok(Self {
            marginals,
            rho_x,
            rho_z,
            factor,
            cdf_samples: DEFAULT_CDF_SAMPLES,
            cdf_seed: DEFAULT_CDF_SEED,
        })
    }

    /// Override the sample count and seed used by [`cdf`](Self::cdf).
    pub fn with_cdf_sampling(mut self, samples: usize, seed: u64) -> Self {
        self.cdf_samples = samples;
        self.cdf_seed = seed;
        self
    }

    /// Number of components of the joint distribution.
    pub fn dim(&self) -> usize {
        self.marginals.len()
    }

    /// The marginal distributions.
    pub fn marginals(&self) -> &[Marginal] {
        &self.marginals
    }

    /// The physical correlation matrix supplied at construction.
    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.rho_x
    }

    /// The derived standard-normal correlation matrix.
    pub fn transformed_correlation(&self) -> &CorrelationMatrix {
        &self.rho_z
    }

    /// Cholesky factor of the transformed correlation matrix.
    pub fn cholesky_factor(&self) -> &CholeskyFactor {
        &self.factor
    }

    /// Map physical samples to independent standard-normal space.
    ///
    /// `x` is flat row-major `n x d`; the result has the same layout. Every
    /// marginal must be continuous, and every component must lie strictly
    /// inside its marginal's support.
    pub fn x2u(&self, x: &[f64]) -> Result<Vec<f64>, NatafError> {
        self.require_continuous("the forward transform")?;
        let d = self.dim();
        let n = self.count_rows(x)?;

        let mut out = Vec::with_capacity(x.len());
        let mut z = vec![0.0; d];
        for row in 0..n {
            self.correlated_normal(&x[row * d..(row + 1) * d], &mut z)?;
            out.extend_from_slice(&self.factor.solve_lower(&z));
        }
        Ok(out)
    }

    /// Forward transform of a single point together with its Jacobian
    /// `du/dx`, returned flat row-major `d x d`.
    pub fn x2u_with_jacobian(&self, x: &[f64]) -> Result<(Vec<f64>, Vec<f64>), NatafError> {
        self.require_continuous("the forward transform")?;
        let d = self.dim();
        if x.len() != d {
            return Err(NatafError::DimensionMismatch {
                expected: d,
                got: x.len(),
            });
        }

        let mut z = vec![0.0; d];
        self.correlated_normal(x, &mut z)?;
        let u = self.factor.solve_lower(&z);

        // du/dx = L^{-1} diag(f_i(x_i) / phi(z_i)), built column by column.
        let mut jac = vec![0.0; d * d];
        let mut e = vec![0.0; d];
        for j in 0..d {
            e[j] = self.marginals[j].pdf(x[j]) / norm_pdf(z[j]);
            let col = self.factor.solve_lower(&e);
            for i in 0..d {
                jac[i * d + j] = col[i];
            }
            e[j] = 0.0;
        }
        Ok((u, jac))
    }

    /// Map independent standard-normal samples to physical space.
    ///
    /// `u` is flat row-major `n x d`. Defined for every marginal family,
    /// including discrete and constant ones.
    pub fn u2x(&self, u: &[f64]) -> Result<Vec<f64>, NatafError> {
        let d = self.dim();
        let n = self.count_rows(u)?;

        let mut out = Vec::with_capacity(u.len());
        for row in 0..n {
            let z = self.factor.transform(&u[row * d..(row + 1) * d]);
            for (m, zi) in self.marginals.iter().zip(&z) {
                out.push(m.physical_from_standard_normal(*zi));
            }
        }
        Ok(out)
    }

    /// Inverse transform of a single point together with its Jacobian
    /// `dx/du`, returned flat row-major `d x d`.
    pub fn u2x_with_jacobian(&self, u: &[f64]) -> Result<(Vec<f64>, Vec<f64>), NatafError> {
        self.require_continuous("Jacobian evaluation")?;
        let d = self.dim();
        if u.len() != d {
            return Err(NatafError::DimensionMismatch {
                expected: d,
                got: u.len(),
            });
        }

        let z = self.factor.transform(u);
        let x: Vec<f64> = self
            .marginals
            .iter()
            .zip(&z)
            .map(|(m, zi)| m.physical_from_standard_normal(*zi))
            .collect();

        // dx/du = diag(phi(z_i) / f_i(x_i)) L.
        let mut jac = vec![0.0; d * d];
        for i in 0..d {
            let scale = norm_pdf(z[i]) / self.marginals[i].pdf(x[i]);
            for j in 0..=i {
                jac[i * d + j] = scale * self.factor.get(i, j);
            }
        }
        Ok((x, jac))
    }

    /// Joint density at each of the `n` points in flat row-major `x`.
    ///
    /// `f(x) = phi_d(z; R_z) * prod f_i(x_i) / prod phi(z_i)` with
    /// `z_i = Phi^{-1}(F_i(x_i))`. Points outside the support get density
    /// zero rather than an error.
    pub fn pdf(&self, x: &[f64]) -> Result<Vec<f64>, NatafError> {
        self.require_continuous("the joint density")?;
        let d = self.dim();
        let n = self.count_rows(x)?;
        let log_det = self.factor.log_determinant();

        let mut out = Vec::with_capacity(n);
        'rows: for row in 0..n {
            let point = &x[row * d..(row + 1) * d];
            let mut z = vec![0.0; d];
            let mut f_prod = 1.0;
            let mut phi_prod = 1.0;
            for (i, m) in self.marginals.iter().enumerate() {
                let fx = m.pdf(point[i]);
                let zi = norm_icdf(m.cdf(point[i]));
                if fx == 0.0 || !zi.is_finite() {
                    out.push(0.0);
                    continue 'rows;
                }
                f_prod *= fx;
                phi_prod *= norm_pdf(zi);
                z[i] = zi;
            }

            let y = self.factor.solve_lower(&z);
            let quad: f64 = y.iter().map(|v| v * v).sum();
            let phi_n = (-0.5 * (quad + log_det + d as f64 * LN_2PI)).exp();
            out.push(phi_n * f_prod / (phi_prod + f64::MIN_POSITIVE));
        }
        Ok(out)
    }

    /// Joint CDF at each of the `n` points in flat row-major `x`.
    ///
    /// Estimated by seeded Monte-Carlo over the transformed correlation
    /// structure, so repeated calls return identical values; accuracy is
    /// governed by the configured sample count (see
    /// [`with_cdf_sampling`](Self::with_cdf_sampling)). The univariate case
    /// is exact.
    pub fn cdf(&self, x: &[f64]) -> Result<Vec<f64>, NatafError> {
        let mut rng = StdRng::seed_from_u64(self.cdf_seed);
        self.cdf_with(x, self.cdf_samples, &mut rng)
    }

    /// Joint CDF with an explicit sample count and generator.
    pub fn cdf_with<R: Rng + ?Sized>(
        &self,
        x: &[f64],
        samples: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, NatafError> {
        self.require_continuous("the joint CDF")?;
        let d = self.dim();
        let n = self.count_rows(x)?;

        let mut out = Vec::with_capacity(n);
        let mut z = vec![0.0; d];
        for row in 0..n {
            let point = &x[row * d..(row + 1) * d];
            for (zi, (m, xi)) in z.iter_mut().zip(self.marginals.iter().zip(point)) {
                *zi = norm_icdf(m.cdf(*xi));
            }
            out.push(mvncdf::standard_mvn_cdf(&self.factor, &z, samples, rng));
        }
        Ok(out)
    }

    /// Draw `n` joint samples, returned flat row-major `n x d`.
    pub fn random<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let d = self.dim();
        let mut out = Vec::with_capacity(n * d);
        let mut u = vec![0.0; d];
        for _ in 0..n {
            for ui in u.iter_mut() {
                *ui = rng.sample(StandardNormal);
            }
            let z = self.factor.transform(&u);
            for (m, zi) in self.marginals.iter().zip(&z) {
                out.push(m.physical_from_standard_normal(*zi));
            }
        }
        out
    }

    /// Marginal standard-normal scores for one physical point; errors when
    /// a component falls on or outside its support boundary.
    fn correlated_normal(&self, point: &[f64], z: &mut [f64]) -> Result<(), NatafError> {
        for (i, (m, xi)) in self.marginals.iter().zip(point).enumerate() {
            let zi = norm_icdf(m.cdf(*xi));
            if !zi.is_finite() {
                return Err(NatafError::OutOfSupport {
                    index: i,
                    value: *xi,
                });
            }
            z[i] = zi;
        }
        Ok(())
    }

    fn count_rows(&self, buf: &[f64]) -> Result<usize, NatafError> {
        let d = self.dim();
        if buf.len() % d != 0 {
            return Err(NatafError::DimensionMismatch {
                expected: d,
                got: buf.len(),
            });
        }
        Ok(buf.len() / d)
    }

    fn require_continuous(&self, operation: &'static str) -> Result<(), NatafError> {
        for (index, m) in self.marginals.iter().enumerate() {
            if !m.is_continuous() {
                return Err(NatafError::NonContinuousMarginal { index, operation });
            }
        }
        Ok(())
    }
}

/// Deterministic per-pair seed for the solver's random restarts.
fn pair_seed(i: usize, j: usize) -> u64 {
    (((i as u64) << 32) | j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bivariate(m0: Marginal, m1: Marginal, rho: f64) -> NatafTransform {
        let corr = CorrelationMatrix::new(&[1.0, rho, rho, 1.0], 2).unwrap();
        NatafTransform::new(vec![m0, m1], corr).unwrap()
    }

    #[test]
    fn test_dimension_mismatch_at_construction() {
        let err = NatafTransform::new(
            vec![Marginal::normal(0.0, 1.0).unwrap()],
            CorrelationMatrix::identity(3),
        )
        .unwrap_err();
        assert_eq!(err, NatafError::DimensionMismatch { expected: 1, got: 3 });
    }

    #[test]
    fn test_divergent_moments_rejected() {
        // Inverse gamma with shape 1.5 has infinite variance.
        let err = NatafTransform::new(
            vec![
                Marginal::inverse_gamma(1.5, 1.0).unwrap(),
                Marginal::normal(0.0, 1.0).unwrap(),
            ],
            CorrelationMatrix::identity(2),
        )
        .unwrap_err();
        assert_eq!(
            err,
            NatafError::NonFiniteMoments {
                index: 0,
                family: "inverse gamma"
            }
        );
    }

    #[test]
    fn test_correlated_constant_rejected() {
        let corr = CorrelationMatrix::new(&[1.0, 0.2, 0.2, 1.0], 2).unwrap();
        let err = NatafTransform::new(
            vec![
                Marginal::constant(1.0).unwrap(),
                Marginal::normal(0.0, 1.0).unwrap(),
            ],
            corr,
        )
        .unwrap_err();
        assert_eq!(err, NatafError::DegenerateCorrelation { index: 0 });

        // An independent constant is fine.
        let ok = NatafTransform::new(
            vec![
                Marginal::constant(1.0).unwrap(),
                Marginal::normal(0.0, 1.0).unwrap(),
            ],
            CorrelationMatrix::identity(2),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_identity_correlation_fast_path() {
        let joint = bivariate(
            Marginal::gamma(2.0, 1.0).unwrap(),
            Marginal::uniform(0.0, 1.0).unwrap(),
            0.0,
        );
        assert!(joint.transformed_correlation().is_identity());
    }

    #[test]
    fn test_normal_marginals_keep_correlation() {
        let joint = bivariate(
            Marginal::normal(1.0, 2.0).unwrap(),
            Marginal::normal(-1.0, 0.5).unwrap(),
            0.7,
        );
        assert_eq!(joint.transformed_correlation().get(0, 1), 0.7);
    }

    #[test]
    fn test_x2u_u2x_roundtrip_normal_pair() {
        let joint = bivariate(
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::normal(2.0, 3.0).unwrap(),
            0.5,
        );
        let x = [0.7, 1.1, -0.4, 5.0];
        let u = joint.x2u(&x).unwrap();
        let back = joint.u2x(&u).unwrap();
        for (a, b) in x.iter().zip(&back) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_forward_transform_rejects_discrete() {
        let joint = NatafTransform::new(
            vec![
                Marginal::discrete(&[0.0, 1.0], &[0.5, 0.5]).unwrap(),
                Marginal::normal(0.0, 1.0).unwrap(),
            ],
            CorrelationMatrix::identity(2),
        )
        .unwrap();
        assert!(matches!(
            joint.x2u(&[0.0, 0.0]),
            Err(NatafError::NonContinuousMarginal { index: 0, .. })
        ));
        // The inverse direction still works, stepping over the atoms.
        let x = joint.u2x(&[-1.0, 0.0]).unwrap();
        assert_eq!(x[0], 0.0);
    }

    #[test]
    fn test_out_of_support_rejected() {
        let joint = bivariate(
            Marginal::uniform(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
            0.0,
        );
        let err = joint.x2u(&[1.5, 0.0]).unwrap_err();
        assert_eq!(
            err,
            NatafError::OutOfSupport {
                index: 0,
                value: 1.5
            }
        );
    }

    #[test]
    fn test_dimension_mismatch_on_ragged_buffer() {
        let joint = bivariate(
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
            0.3,
        );
        assert!(matches!(
            joint.x2u(&[0.0, 0.0, 0.0]),
            Err(NatafError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_independent_pdf_is_product_of_marginals() {
        let m0 = Marginal::gamma(2.0, 1.0).unwrap();
        let m1 = Marginal::uniform(0.0, 1.0).unwrap();
        let joint = bivariate(m0.clone(), m1.clone(), 0.0);
        let x = [1.3, 0.4];
        let joint_pdf = joint.pdf(&x).unwrap()[0];
        assert_relative_eq!(joint_pdf, m0.pdf(1.3) * m1.pdf(0.4), max_relative = 1e-9);
    }

    #[test]
    fn test_pdf_outside_support_is_zero() {
        let joint = bivariate(
            Marginal::uniform(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
            0.0,
        );
        assert_eq!(joint.pdf(&[2.0, 0.0]).unwrap()[0], 0.0);
    }

    #[test]
    fn test_jacobians_are_inverse_of_each_other() {
        let joint = bivariate(
            Marginal::lognormal(0.0, 0.5).unwrap(),
            Marginal::gamma(3.0, 2.0).unwrap(),
            0.4,
        );
        let x = [1.2, 1.5];
        let (u, jx) = joint.x2u_with_jacobian(&x).unwrap();
        let (x_back, ju) = joint.u2x_with_jacobian(&u).unwrap();
        for (a, b) in x.iter().zip(&x_back) {
            assert_relative_eq!(a, b, epsilon = 1e-8);
        }
        // jx * ju should be the identity.
        for i in 0..2 {
            for j in 0..2 {
                let prod: f64 = (0..2).map(|k| jx[i * 2 + k] * ju[k * 2 + j]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod, expected, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_cdf_is_reproducible_and_sane() {
        let joint = bivariate(
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
            0.5,
        )
        .with_cdf_sampling(50_000, 11);
        let a = joint.cdf(&[0.0, 0.0]).unwrap()[0];
        let b = joint.cdf(&[0.0, 0.0]).unwrap()[0];
        assert_eq!(a, b);
        // P(Z1 <= 0, Z2 <= 0) with rho = 0.5 is 1/3.
        assert_relative_eq!(a, 1.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_random_respects_marginal_supports() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let joint = bivariate(
            Marginal::uniform(-1.0, 2.0).unwrap(),
            Marginal::exponential(1.0).unwrap(),
            0.6,
        );
        let mut rng = StdRng::seed_from_u64(5);
        let draws = joint.random(500, &mut rng);
        assert_eq!(draws.len(), 1000);
        for row in draws.chunks_exact(2) {
            assert!((-1.0..=2.0).contains(&row[0]));
            assert!(row[1] >= 0.0);
        }
    }
}
