//! Error function family and standard-normal helpers.
//!
//! `erf`/`erfc` are evaluated through the regularized incomplete gamma
//! function (`erf(x) = sgn(x) · P(1/2, x²)`), which is accurate to near
//! machine precision in both tails. The standard-normal quantile uses
//! Acklam's rational approximation polished by one Halley step against the
//! high-precision CDF.

use super::gamma::{gamma_p, gamma_q};

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// The error function `erf(x) = (2/√π) ∫₀ˣ e^(-t²) dt`.
///
/// # Example
///
/// ```
/// use uq_core::math::special::erf;
///
/// assert!((erf(1.0) - 0.8427007929497149).abs() < 1e-13);
/// assert_eq!(erf(0.0), 0.0);
/// ```
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let p = gamma_p(0.5, x * x).unwrap_or(1.0);
    if x > 0.0 {
        p
    } else {
        -p
    }
}

/// The complementary error function `erfc(x) = 1 - erf(x)`.
///
/// Computed directly from the upper incomplete gamma function for positive
/// arguments, so the far tail does not lose precision to cancellation.
pub fn erfc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x > 0.0 {
        gamma_q(0.5, x * x).unwrap_or(0.0)
    } else {
        1.0 + gamma_p(0.5, x * x).unwrap_or(1.0)
    }
}

/// Standard normal probability density `φ(x) = exp(-x²/2) / √(2π)`.
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution function `Φ(x)`.
///
/// `Φ(x) = erfc(-x/√2) / 2`; accurate to near machine precision including
/// the far tails (e.g. `Φ(-8) ≈ 6.22e-16`).
///
/// # Example
///
/// ```
/// use uq_core::math::special::norm_cdf;
///
/// assert_eq!(norm_cdf(0.0), 0.5);
/// assert!((norm_cdf(1.0) - 0.8413447460685429).abs() < 1e-13);
/// ```
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal quantile function `Φ⁻¹(p)`.
///
/// Acklam's rational approximation (max error ~1.15e-9) refined by a single
/// Halley step, giving close to machine precision on `(0, 1)`. Returns
/// `-∞` for `p <= 0` and `+∞` for `p >= 1`.
///
/// # Example
///
/// ```
/// use uq_core::math::special::{norm_cdf, norm_icdf};
///
/// let x = norm_icdf(0.975);
/// assert!((x - 1.959963984540054).abs() < 1e-9);
/// assert!((norm_cdf(norm_icdf(0.3)) - 0.3).abs() < 1e-14);
/// ```
pub fn norm_icdf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let x = acklam(p);

    // One Halley step against the accurate CDF. The correction factor
    // exp(x²/2) stays finite over the representable quantile range.
    let e = norm_cdf(x) - p;
    let u = e * (2.0 * std::f64::consts::PI).sqrt() * (0.5 * x * x).exp();
    if u.is_finite() {
        x - u / (1.0 + 0.5 * x * u)
    } else {
        x
    }
}

/// Acklam's rational approximation to the inverse standard normal CDF.
fn acklam(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_erf_reference_values() {
        assert_relative_eq!(erf(1.0), 0.842_700_792_949_714_9, epsilon = 1e-13);
        assert_relative_eq!(erf(2.0), 0.995_322_265_018_952_7, epsilon = 1e-13);
        assert_relative_eq!(erf(-1.0), -0.842_700_792_949_714_9, epsilon = 1e-13);
    }

    #[test]
    fn test_erfc_far_tail() {
        // erfc(5) ≈ 1.5375e-12; direct 1 - erf(5) would lose all digits.
        assert_relative_eq!(erfc(5.0), 1.537_459_794_428_035e-12, epsilon = 1e-6);
        assert_relative_eq!(erfc(-5.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_erf_erfc_complementary() {
        for x in [-3.0, -1.0, -0.2, 0.5, 1.7, 4.0] {
            assert_relative_eq!(erf(x) + erfc(x), 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_norm_pdf_at_zero() {
        assert_relative_eq!(norm_pdf(0.0), FRAC_1_SQRT_2PI, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_eq!(norm_cdf(0.0), 0.5);
        assert_relative_eq!(norm_cdf(1.0), 0.841_344_746_068_542_9, epsilon = 1e-13);
        assert_relative_eq!(norm_cdf(-1.0), 0.158_655_253_931_457_07, epsilon = 1e-13);
        assert_relative_eq!(norm_cdf(2.0), 0.977_249_868_051_820_8, epsilon = 1e-13);
    }

    #[test]
    fn test_norm_cdf_far_tail() {
        assert_relative_eq!(norm_cdf(-8.0), 6.220_960_574_271_786e-16, epsilon = 1e-6);
        assert!(norm_cdf(8.0) <= 1.0);
        assert!(1.0 - norm_cdf(8.0) < 1e-14);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [0.3, 1.0, 2.5, 5.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_norm_icdf_reference_values() {
        assert_relative_eq!(norm_icdf(0.5), 0.0, epsilon = 1e-12);
        assert_relative_eq!(norm_icdf(0.975), 1.959_963_984_540_054, epsilon = 1e-10);
        assert_relative_eq!(norm_icdf(0.025), -1.959_963_984_540_054, epsilon = 1e-10);
    }

    #[test]
    fn test_norm_icdf_edges() {
        assert_eq!(norm_icdf(0.0), f64::NEG_INFINITY);
        assert_eq!(norm_icdf(1.0), f64::INFINITY);
    }

    #[test]
    fn test_norm_roundtrip_over_wide_range() {
        // x → Φ(x) → Φ⁻¹ must reproduce x to 1e-9 over [-6, 6].
        let mut x = -6.0;
        while x <= 6.0 {
            let back = norm_icdf(norm_cdf(x));
            assert!(
                (back - x).abs() < 1e-9,
                "roundtrip failed at x = {}: got {}",
                x,
                back
            );
            x += 0.25;
        }
    }

    proptest! {
        #[test]
        fn prop_norm_icdf_roundtrip(p in 1e-10_f64..1.0) {
            let p = p.min(1.0 - 1e-10);
            let x = norm_icdf(p);
            prop_assert!((norm_cdf(x) - p).abs() < 1e-12);
        }

        #[test]
        fn prop_norm_cdf_monotone(a in -10.0_f64..10.0, b in -10.0_f64..10.0) {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(norm_cdf(lo) <= norm_cdf(hi));
        }
    }
}
