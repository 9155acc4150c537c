//! Pairwise equivalent-correlation solver.
//!
//! For a pair of marginals with physical correlation `rho_x`, find the
//! standard-normal correlation `rho_z` whose Gaussian copula reproduces
//! `rho_x` after mapping back through the marginals:
//!
//! `rho_x = E[ g_i(Z_i) g_j(Z_j) ]` with `g(z) = (F^{-1}(Phi(z)) - mu) / sigma`
//! and `(Z_i, Z_j)` standard bivariate normal with correlation `rho_z`.
//!
//! The expectation is evaluated on a fixed tensor-product Gauss-Legendre
//! grid, and the scalar equation is solved by Brent's method over almost the
//! whole admissible interval, falling back to secant iteration from a ladder
//! of starting points when the bracket fails.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uq_core::math::quadrature::GaussLegendre;
use uq_core::math::solvers::{BrentSolver, SecantSolver, SolverConfig};

use crate::marginal::Marginal;

/// Quadrature points per axis.
const QUAD_POINTS: usize = 1024;

/// The integration domain `[-QUAD_BOUND, QUAD_BOUND]` covers the standard
/// normal up to mass below 1e-15 per tail.
const QUAD_BOUND: f64 = 8.0;

/// Margin keeping the Brent bracket strictly inside `(-1, 1)`.
const BRACKET_MARGIN: f64 = 1e-6;

/// A candidate root is accepted only if the residual of the moment equation
/// is below this.
const RESIDUAL_TOL: f64 = 1e-5;

/// Number of random secant restarts after the deterministic ones.
const RANDOM_RESTARTS: usize = 10;

/// Process-wide quadrature grid, built once on first use.
fn grid() -> &'static GaussLegendre {
    static GRID: OnceLock<GaussLegendre> = OnceLock::new();
    GRID.get_or_init(|| GaussLegendre::new(QUAD_POINTS).mapped(-QUAD_BOUND, QUAD_BOUND))
}

/// Standard bivariate normal density with correlation `rho`.
#[inline]
fn bivariate_norm_pdf(x: f64, y: f64, rho: f64) -> f64 {
    let o = 1.0 - rho * rho;
    (-(x * x - 2.0 * rho * x * y + y * y) / (2.0 * o)).exp()
        / (2.0 * std::f64::consts::PI * o.sqrt())
}

/// Closed forms for pairs involving only normal and lognormal marginals.
fn closed_form(mi: &Marginal, mj: &Marginal, rho: f64) -> Option<f64> {
    match (mi, mj) {
        (Marginal::Normal { .. }, Marginal::Normal { .. }) => Some(rho),
        (Marginal::Normal { .. }, Marginal::Lognormal { sigma, .. })
        | (Marginal::Lognormal { sigma, .. }, Marginal::Normal { .. }) => {
            // rho * V / sqrt(ln(1 + V^2)) with V the coefficient of
            // variation; ln(1 + V^2) = sigma^2.
            let v = (sigma * sigma).exp_m1().sqrt();
            Some(rho * v / sigma)
        }
        (
            Marginal::Lognormal { sigma: si, .. },
            Marginal::Lognormal { sigma: sj, .. },
        ) => {
            let vi = (si * si).exp_m1().sqrt();
            let vj = (sj * sj).exp_m1().sqrt();
            Some((rho * vi * vj).ln_1p() / (si * sj))
        }
        _ => None,
    }
}

/// Standardized marginal transform evaluated at every quadrature node,
/// pre-multiplied by the node weight.
fn weighted_standardized_nodes(m: &Marginal, rule: &GaussLegendre) -> Vec<f64> {
    let mean = m.mean();
    let std_dev = m.std_dev();
    rule.nodes()
        .iter()
        .zip(rule.weights())
        .map(|(&t, &w)| w * (m.physical_from_standard_normal(t) - mean) / std_dev)
        .collect()
}

/// Equivalent standard-normal correlation for one marginal pair, or `None`
/// when no admissible solution exists.
///
/// `seed` controls the random secant restarts, so the same pair always
/// follows the same search path.
pub(crate) fn equivalent_correlation(
    mi: &Marginal,
    mj: &Marginal,
    rho_x: f64,
    seed: u64,
) -> Option<f64> {
    if rho_x == 0.0 {
        return Some(0.0);
    }
    if let Some(r) = closed_form(mi, mj, rho_x) {
        return (r.abs() < 1.0).then_some(r);
    }

    let rule = grid();
    let gi = weighted_standardized_nodes(mi, rule);
    let gj = weighted_standardized_nodes(mj, rule);
    let nodes = rule.nodes();

    let f = |rho: f64| {
        let mut sum = 0.0;
        for (k, &a) in gi.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            let xk = nodes[k];
            let mut inner = 0.0;
            for (l, &b) in gj.iter().enumerate() {
                inner += b * bivariate_norm_pdf(xk, nodes[l], rho);
            }
            sum += a * inner;
        }
        sum - rho_x
    };

    // The moment equation is monotone in rho for most marginal pairs, so a
    // full-interval bracket usually succeeds on the first try.
    let brent = BrentSolver::new(SolverConfig::new(1e-10, 100));
    if let Ok(r) = brent.find_root(&f, -1.0 + BRACKET_MARGIN, 1.0 - BRACKET_MARGIN) {
        if r.abs() < 1.0 && f(r).abs() < RESIDUAL_TOL {
            return Some(r);
        }
    }

    debug!(
        rho_x,
        family_i = mi.family(),
        family_j = mj.family(),
        "bracketed search failed, falling back to secant restarts"
    );

    let secant = SecantSolver::new(SolverConfig::new(1e-10, 100));
    let mut rng = StdRng::seed_from_u64(seed);
    let starts = [rho_x, -rho_x]
        .into_iter()
        .chain((0..RANDOM_RESTARTS).map(|_| rng.gen_range(-1.0..1.0)));
    for start in starts {
        if let Ok(r) = secant.find_root(&f, start) {
            if r.abs() < 1.0 && f(r).abs() < RESIDUAL_TOL {
                return Some(r);
            }
        }
    }
    None
}
