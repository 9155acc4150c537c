//! Log-gamma and the regularized incomplete gamma functions.

use crate::types::SpecialError;

/// Maximum iterations for series / continued fraction.
const MAX_ITER: usize = 300;

/// Lanczos coefficients (g = 7, 9 terms).
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural logarithm of the gamma function.
///
/// Uses the Lanczos approximation for `x >= 0.5` and the reflection formula
/// below; accurate to about 1e-13 relative over the positive axis.
///
/// # Example
///
/// ```
/// use uq_core::math::special::ln_gamma;
///
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-12);
/// // Γ(1/2) = √π
/// assert!((ln_gamma(0.5) - 0.5 * std::f64::consts::PI.ln()).abs() < 1e-12);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        let pi = std::f64::consts::PI;
        (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut a = LANCZOS[0];
        let t = x + 7.5;
        for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
    }
}

/// Regularized lower incomplete gamma function `P(a, x)`.
///
/// `P(a, x) = γ(a, x) / Γ(a)` with `γ(a, x) = ∫₀ˣ t^(a-1) e^(-t) dt`.
/// Requires `a > 0` and `x >= 0`.
///
/// # Example
///
/// ```
/// use uq_core::math::special::gamma_p;
///
/// // P(1, x) = 1 - e^(-x)
/// let x = 1.5_f64;
/// assert!((gamma_p(1.0, x).unwrap() - (1.0 - (-x).exp())).abs() < 1e-13);
/// ```
pub fn gamma_p(a: f64, x: f64) -> Result<f64, SpecialError> {
    gamma_pair(a, x).map(|(p, _)| p)
}

/// Regularized upper incomplete gamma function `Q(a, x) = 1 - P(a, x)`.
pub fn gamma_q(a: f64, x: f64) -> Result<f64, SpecialError> {
    gamma_pair(a, x).map(|(_, q)| q)
}

/// Compute `P(a, x)` and `Q(a, x)` together, choosing the representation
/// that converges fastest: series for `x < a + 1`, continued fraction
/// otherwise. The complement is formed from the directly computed side, so
/// neither tail suffers cancellation.
fn gamma_pair(a: f64, x: f64) -> Result<(f64, f64), SpecialError> {
    if a <= 0.0 || x < 0.0 {
        return Err(SpecialError::DomainError);
    }
    if x == 0.0 {
        return Ok((0.0, 1.0));
    }

    let prefactor = (-x + a * x.ln() - ln_gamma(a)).exp();

    if x < a + 1.0 {
        let p = series_p(a, x, prefactor)?;
        Ok((p, 1.0 - p))
    } else {
        let q = continued_fraction_q(a, x, prefactor)?;
        Ok((1.0 - q, q))
    }
}

/// Series expansion `P(a, x) = prefactor · Σ xⁿ / (a(a+1)…(a+n))`.
fn series_p(a: f64, x: f64, prefactor: f64) -> Result<f64, SpecialError> {
    let mut ap = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * f64::EPSILON {
            return Ok(prefactor * sum);
        }
    }
    Err(SpecialError::ConvergenceFailure)
}

/// Modified-Lentz continued fraction for `Q(a, x)` with partial numerators
/// `a_n = n(a - n)` and denominators `b_n = x + 2n + 1 - a`.
fn continued_fraction_q(a: f64, x: f64, prefactor: f64) -> Result<f64, SpecialError> {
    const TINY: f64 = 1e-30;

    let b0 = x + 1.0 - a;
    let mut f = if b0.abs() < TINY { TINY } else { b0 };
    let mut c = f;
    let mut d = 0.0;

    for n in 1..=MAX_ITER {
        let nf = n as f64;
        let an = nf * (a - nf);
        let bn = x + 2.0 * nf + 1.0 - a;

        d = bn + an * d;
        if d.abs() < TINY {
            d = TINY;
        }
        d = 1.0 / d;

        c = bn + an / c;
        if c.abs() < TINY {
            c = TINY;
        }

        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() < f64::EPSILON {
            return Ok(prefactor / f);
        }
    }
    Err(SpecialError::ConvergenceFailure)
}

/// Inverse of the regularized lower incomplete gamma function.
///
/// Returns `x` such that `P(a, x) = p`. Safeguarded Newton iteration from a
/// Wilson-Hilferty (for `a > 1`) or small-`a` initial guess.
///
/// `p <= 0` returns 0; `p >= 1` returns a value far into the upper tail
/// rather than infinity, matching the behaviour callers need when a CDF
/// rounds up to 1.
pub fn gamma_p_inv(a: f64, p: f64) -> Result<f64, SpecialError> {
    const EPS: f64 = 1e-10;

    if a <= 0.0 {
        return Err(SpecialError::DomainError);
    }
    if p <= 0.0 {
        return Ok(0.0);
    }
    if p >= 1.0 {
        return Ok(100.0_f64.max(a + 100.0 * a.sqrt()));
    }

    let gln = ln_gamma(a);
    let a1 = a - 1.0;
    let (mut lna1, mut afac) = (0.0, 0.0);

    let mut x = if a > 1.0 {
        lna1 = a1.ln();
        afac = (a1 * (lna1 - 1.0) - gln).exp();
        let pp = if p < 0.5 { p } else { 1.0 - p };
        let t = (-2.0 * pp.ln()).sqrt();
        let mut z = (2.30753 + t * 0.27061) / (1.0 + t * (0.99229 + t * 0.04481)) - t;
        if p < 0.5 {
            z = -z;
        }
        let wh = 1.0 - 1.0 / (9.0 * a) - z / (3.0 * a.sqrt());
        (a * wh * wh * wh).max(1e-3)
    } else {
        let t = 1.0 - a * (0.253 + a * 0.12);
        if p < t {
            (p / t).powf(1.0 / a)
        } else {
            1.0 - (1.0 - (p - t) / (1.0 - t)).ln()
        }
    };

    for _ in 0..12 {
        if x <= 0.0 {
            return Ok(0.0);
        }
        let err = gamma_p(a, x)? - p;
        let t = if a > 1.0 {
            afac * (-(x - a1) + a1 * (x.ln() - lna1)).exp()
        } else {
            (-x + a1 * x.ln() - gln).exp()
        };
        let u = err / t;
        // Halley correction, clamped to keep the step stable.
        let dx = u / (1.0 - 0.5 * (u * (a1 / x - 1.0)).min(1.0));
        x -= dx;
        if x <= 0.0 {
            x = 0.5 * (x + dx);
        }
        if dx.abs() < EPS * x {
            break;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ln_gamma_integers() {
        // Γ(n) = (n-1)!
        let factorials = [1.0, 1.0, 2.0, 6.0, 24.0, 120.0, 720.0];
        for (n, &f) in factorials.iter().enumerate() {
            assert_relative_eq!(ln_gamma((n + 1) as f64), f64::ln(f), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ln_gamma_half() {
        assert_relative_eq!(
            ln_gamma(0.5),
            (std::f64::consts::PI.sqrt()).ln(),
            epsilon = 1e-12
        );
        // Γ(3/2) = √π / 2
        assert_relative_eq!(
            ln_gamma(1.5),
            (std::f64::consts::PI.sqrt() / 2.0).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_gamma_p_at_zero() {
        assert_eq!(gamma_p(2.0, 0.0).unwrap(), 0.0);
        assert_eq!(gamma_q(2.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_gamma_p_exponential_identity() {
        for x in [0.1, 0.5, 1.0, 2.0, 10.0] {
            assert_relative_eq!(
                gamma_p(1.0, x).unwrap(),
                1.0 - (-x as f64).exp(),
                epsilon = 1e-13
            );
        }
    }

    #[test]
    fn test_gamma_p_q_complementary() {
        for a in [0.3, 1.0, 2.5, 10.0] {
            for x in [0.2, 1.0, 3.0, 15.0] {
                let p = gamma_p(a, x).unwrap();
                let q = gamma_q(a, x).unwrap();
                assert_relative_eq!(p + q, 1.0, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_gamma_p_reference_value() {
        // P(3, 3) = 1 - e^{-3}(1 + 3 + 4.5)
        let expected = 1.0 - (-3.0_f64).exp() * 8.5;
        assert_relative_eq!(gamma_p(3.0, 3.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_gamma_domain_errors() {
        assert_eq!(gamma_p(-1.0, 1.0), Err(SpecialError::DomainError));
        assert_eq!(gamma_p(1.0, -1.0), Err(SpecialError::DomainError));
    }

    #[test]
    fn test_gamma_p_inv_roundtrip() {
        for a in [0.5, 1.0, 2.0, 7.5] {
            for p in [1e-6, 0.01, 0.3, 0.5, 0.9, 0.999] {
                let x = gamma_p_inv(a, p).unwrap();
                assert_relative_eq!(gamma_p(a, x).unwrap(), p, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_gamma_p_inv_edges() {
        assert_eq!(gamma_p_inv(2.0, 0.0).unwrap(), 0.0);
        assert!(gamma_p_inv(2.0, 1.0).unwrap() > 50.0);
    }
}
