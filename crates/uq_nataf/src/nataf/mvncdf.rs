//! Monte-Carlo rectangle probabilities for the standard multivariate normal.

use rand::Rng;
use rand_distr::StandardNormal;
use uq_core::math::special::norm_cdf;

use super::correlation::CholeskyFactor;

/// Estimate `P(Z_1 <= b_1, ..., Z_d <= b_d)` for a zero-mean unit-variance
/// multivariate normal whose correlation matrix has the given Cholesky
/// factor.
///
/// The univariate case is evaluated exactly; higher dimensions use plain
/// Monte-Carlo with `samples` draws, so the standard error scales as
/// `1 / sqrt(samples)`.
///
/// Infinite bounds behave naturally: a `+inf` component never rejects a
/// draw, a `-inf` component rejects all of them.
pub(crate) fn standard_mvn_cdf<R: Rng + ?Sized>(
    factor: &CholeskyFactor,
    upper: &[f64],
    samples: usize,
    rng: &mut R,
) -> f64 {
    debug_assert_eq!(upper.len(), factor.dim());

    if factor.dim() == 1 {
        return norm_cdf(upper[0]);
    }
    if upper.iter().any(|b| *b == f64::NEG_INFINITY) {
        return 0.0;
    }

    let d = factor.dim();
    let mut z = vec![0.0; d];
    let mut hits = 0usize;
    for _ in 0..samples {
        for zi in z.iter_mut() {
            *zi = rng.sample(StandardNormal);
        }
        let mut inside = true;
        // Row i of the correlated draw is sum_j L_ij z_j; stop at the first
        // component leaving the rectangle.
        for i in 0..d {
            let mut s = 0.0;
            for j in 0..=i {
                s += factor.get(i, j) * z[j];
            }
            if s > upper[i] {
                inside = false;
                break;
            }
        }
        if inside {
            hits += 1;
        }
    }
    hits as f64 / samples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nataf::CorrelationMatrix;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_univariate_is_exact() {
        let factor = CorrelationMatrix::identity(1).cholesky().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let p = standard_mvn_cdf(&factor, &[1.0], 10, &mut rng);
        assert_relative_eq!(p, norm_cdf(1.0), epsilon = 1e-15);
    }

    #[test]
    fn test_independent_bivariate_factorizes() {
        let factor = CorrelationMatrix::identity(2).cholesky().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let p = standard_mvn_cdf(&factor, &[0.0, 0.0], 200_000, &mut rng);
        assert_relative_eq!(p, 0.25, epsilon = 5e-3);
    }

    #[test]
    fn test_correlated_orthant_probability() {
        // P(Z1 <= 0, Z2 <= 0) = 1/4 + asin(rho) / (2 pi).
        let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
        let factor = corr.cholesky().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let p = standard_mvn_cdf(&factor, &[0.0, 0.0], 200_000, &mut rng);
        let expected = 0.25 + 0.5_f64.asin() / (2.0 * std::f64::consts::PI);
        assert_relative_eq!(p, expected, epsilon = 5e-3);
    }

    #[test]
    fn test_infinite_bounds() {
        let factor = CorrelationMatrix::identity(2).cholesky().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            standard_mvn_cdf(&factor, &[f64::NEG_INFINITY, 0.0], 100, &mut rng),
            0.0
        );
        let p = standard_mvn_cdf(&factor, &[f64::INFINITY, 0.0], 100_000, &mut rng);
        assert_relative_eq!(p, 0.5, epsilon = 5e-3);
    }

    #[test]
    fn test_seed_reproducibility() {
        let corr = CorrelationMatrix::new(&[1.0, 0.3, 0.3, 1.0], 2).unwrap();
        let factor = corr.cholesky().unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let pa = standard_mvn_cdf(&factor, &[0.5, -0.2], 10_000, &mut a);
        let pb = standard_mvn_cdf(&factor, &[0.5, -0.2], 10_000, &mut b);
        assert_eq!(pa, pb);
    }
}
