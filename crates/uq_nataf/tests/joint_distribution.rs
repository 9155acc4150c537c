//! End-to-end properties of the Nataf joint distribution.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uq_core::math::quadrature::GaussLegendre;
use uq_nataf::marginal::Marginal;
use uq_nataf::nataf::{CorrelationError, CorrelationMatrix, NatafError, NatafTransform};

fn mixed_trivariate() -> NatafTransform {
    let marginals = vec![
        Marginal::gamma(2.0, 1.5).unwrap(),
        Marginal::uniform(-1.0, 2.0).unwrap(),
        Marginal::lognormal(0.3, 0.6).unwrap(),
    ];
    let corr = CorrelationMatrix::new(
        &[1.0, 0.3, 0.2, 0.3, 1.0, 0.4, 0.2, 0.4, 1.0],
        3,
    )
    .unwrap();
    NatafTransform::new(marginals, corr).unwrap()
}

#[test]
fn normal_lognormal_equivalent_correlation() {
    // For N(0,1) and LN(0,1) at physical correlation 0.5 the equivalent
    // normal correlation is 0.5 sqrt(e - 1), about 0.65541.
    let joint = NatafTransform::new(
        vec![
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::lognormal(0.0, 1.0).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap(),
    )
    .unwrap();
    let expected = 0.5 * std::f64::consts::E.sqrt() * (1.0 - (-1.0_f64).exp()).sqrt();
    assert_relative_eq!(
        joint.transformed_correlation().get(0, 1),
        expected,
        epsilon = 1e-10
    );
}

#[test]
fn uniform_pair_equivalent_correlation() {
    // Two uniforms follow rho_z = 2 sin(pi rho_x / 6), solved through the
    // full quadrature path.
    let joint = NatafTransform::new(
        vec![
            Marginal::uniform(0.0, 1.0).unwrap(),
            Marginal::uniform(5.0, 9.0).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap(),
    )
    .unwrap();
    let expected = 2.0 * (std::f64::consts::PI / 12.0).sin();
    assert_relative_eq!(
        joint.transformed_correlation().get(0, 1),
        expected,
        epsilon = 1e-4
    );
}

#[test]
fn roundtrip_through_standard_normal_space() {
    let joint = mixed_trivariate();
    let x = [
        0.8, 0.2, 1.1, //
        2.5, -0.7, 0.6, //
        1.4, 1.9, 2.3,
    ];
    let u = joint.x2u(&x).unwrap();
    let back = joint.u2x(&u).unwrap();
    for (a, b) in x.iter().zip(&back) {
        assert_relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-6);
    }

    // And the other direction.
    let u0 = [0.4, -1.2, 0.9];
    let x0 = joint.u2x(&u0).unwrap();
    let u_back = joint.x2u(&x0).unwrap();
    for (a, b) in u0.iter().zip(&u_back) {
        assert_relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-6);
    }
}

#[test]
fn sampling_reproduces_marginal_moments_and_correlation() {
    let joint = NatafTransform::new(
        vec![
            Marginal::normal(1.0, 2.0).unwrap(),
            Marginal::lognormal(0.0, 0.5).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap(),
    )
    .unwrap();

    let mut rng = StdRng::seed_from_u64(2024);
    let n = 100_000;
    let draws = joint.random(n, &mut rng);
    assert_eq!(draws.len(), 2 * n);

    let mut mean = [0.0; 2];
    for row in draws.chunks_exact(2) {
        mean[0] += row[0];
        mean[1] += row[1];
    }
    mean[0] /= n as f64;
    mean[1] /= n as f64;
    assert_relative_eq!(mean[0], joint.marginals()[0].mean(), max_relative = 0.02);
    assert_relative_eq!(mean[1], joint.marginals()[1].mean(), max_relative = 0.02);

    let (mut var0, mut var1, mut cov) = (0.0, 0.0, 0.0);
    for row in draws.chunks_exact(2) {
        let d0 = row[0] - mean[0];
        let d1 = row[1] - mean[1];
        var0 += d0 * d0;
        var1 += d1 * d1;
        cov += d0 * d1;
    }
    let corr = cov / (var0.sqrt() * var1.sqrt());
    // The physical correlation is recovered by the samples.
    assert_relative_eq!(corr, 0.5, epsilon = 0.02);
}

#[test]
fn joint_density_integrates_to_one() {
    let joint = NatafTransform::new(
        vec![
            Marginal::gamma(2.0, 1.0).unwrap(),
            Marginal::uniform(0.0, 1.0).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, 0.4, 0.4, 1.0], 2).unwrap(),
    )
    .unwrap();

    // Tensor quadrature over a box capturing essentially all the mass.
    let rule_x = GaussLegendre::new(96).mapped(1e-9, 25.0);
    let rule_y = GaussLegendre::new(48).mapped(1e-9, 1.0 - 1e-9);
    let mut points = Vec::with_capacity(rule_x.len() * rule_y.len());
    for &xi in rule_x.nodes() {
        for &yi in rule_y.nodes() {
            points.push(xi);
            points.push(yi);
        }
    }
    let densities = joint.pdf(&points).unwrap();

    let mut integral = 0.0;
    let mut idx = 0;
    for &wx in rule_x.weights() {
        for &wy in rule_y.weights() {
            integral += wx * wy * densities[idx];
            idx += 1;
        }
    }
    assert_relative_eq!(integral, 1.0, epsilon = 1e-4);
}

#[test]
fn joint_density_is_nonnegative() {
    let joint = mixed_trivariate();
    let mut rng = StdRng::seed_from_u64(31);
    let draws = joint.random(200, &mut rng);
    for p in joint.pdf(&draws).unwrap() {
        assert!(p >= 0.0);
        assert!(p.is_finite());
    }
}

#[test]
fn univariate_cdf_is_exact() {
    let joint = NatafTransform::new(
        vec![Marginal::exponential(2.0).unwrap()],
        CorrelationMatrix::identity(1),
    )
    .unwrap();
    let c = joint.cdf(&[1.0]).unwrap()[0];
    assert_relative_eq!(c, 1.0 - (-2.0_f64).exp(), epsilon = 1e-12);
}

#[test]
fn invalid_correlation_matrices_are_rejected() {
    assert!(matches!(
        CorrelationMatrix::new(&[1.0, 0.5, 0.4, 1.0], 2),
        Err(CorrelationError::NotSymmetric { .. })
    ));
    assert!(matches!(
        CorrelationMatrix::new(&[0.9, 0.5, 0.5, 1.0], 2),
        Err(CorrelationError::InvalidDiagonal { .. })
    ));
    assert!(matches!(
        CorrelationMatrix::new(&[1.0, -1.4, -1.4, 1.0], 2),
        Err(CorrelationError::OutOfRange { .. })
    ));

    // Pairwise admissible but jointly indefinite.
    let corr = CorrelationMatrix::new(
        &[1.0, 0.9, -0.9, 0.9, 1.0, 0.9, -0.9, 0.9, 1.0],
        3,
    )
    .unwrap();
    let err = NatafTransform::new(
        vec![
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
            Marginal::normal(0.0, 1.0).unwrap(),
        ],
        corr,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        NatafError::Correlation(CorrelationError::NotPositiveDefinite { .. })
    ));
}

#[test]
fn infeasible_pair_reports_the_pair() {
    // Strongly negative correlation between two exponentials is not
    // representable under a Gaussian copula.
    let err = NatafTransform::new(
        vec![
            Marginal::exponential(1.0).unwrap(),
            Marginal::exponential(1.0).unwrap(),
        ],
        CorrelationMatrix::new(&[1.0, -0.99, -0.99, 1.0], 2).unwrap(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        NatafError::UnsolvablePair {
            i: 0,
            j: 1,
            rho: -0.99
        }
    );
}

#[test]
fn construction_is_deterministic() {
    let a = mixed_trivariate();
    let b = mixed_trivariate();
    assert_eq!(
        a.transformed_correlation().as_slice(),
        b.transformed_correlation().as_slice()
    );

    let mut rng_a = StdRng::seed_from_u64(77);
    let mut rng_b = StdRng::seed_from_u64(77);
    assert_eq!(a.random(50, &mut rng_a), b.random(50, &mut rng_b));
}
