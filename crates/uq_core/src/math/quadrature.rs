//! Gauss-Legendre quadrature rule generation.
//!
//! Nodes are roots of the Legendre polynomial `P_n`, found by Newton
//! iteration on the three-term recurrence; weights follow from the
//! derivative at each root. Rules are exact for polynomials of degree
//! `2n - 1` on the reference interval `[-1, 1]` and can be affinely mapped
//! to an arbitrary `[a, b]`.

use std::f64::consts::PI;

/// An n-point Gauss-Legendre rule on a fixed interval.
///
/// # Example
///
/// ```
/// use uq_core::math::quadrature::GaussLegendre;
///
/// // ∫₀¹ x² dx = 1/3
/// let rule = GaussLegendre::new(16).mapped(0.0, 1.0);
/// let integral: f64 = rule
///     .nodes()
///     .iter()
///     .zip(rule.weights())
///     .map(|(&x, &w)| w * x * x)
///     .sum();
/// assert!((integral - 1.0 / 3.0).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Build the n-point rule on the reference interval `[-1, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "quadrature order must be at least 1");

        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        let nf = n as f64;

        // Roots come in symmetric pairs; solve only the lower half.
        let m = (n + 1) / 2;
        for i in 0..m {
            // Chebyshev-based initial guess for the i-th root.
            let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            let mut pp;
            loop {
                // Evaluate P_n(z) via the recurrence, tracking P_{n-1}.
                let mut p1 = 1.0;
                let mut p2 = 0.0;
                for j in 0..n {
                    let p3 = p2;
                    p2 = p1;
                    let jf = j as f64;
                    p1 = ((2.0 * jf + 1.0) * z * p2 - jf * p3) / (jf + 1.0);
                }
                pp = nf * (z * p1 - p2) / (z * z - 1.0);
                let z1 = z;
                z = z1 - p1 / pp;
                if (z - z1).abs() < 1e-15 {
                    break;
                }
            }
            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            let w = 2.0 / ((1.0 - z * z) * pp * pp);
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        Self { nodes, weights }
    }

    /// Affinely map the rule to the interval `[a, b]`.
    pub fn mapped(&self, a: f64, b: f64) -> Self {
        let scale = 0.5 * (b - a);
        let shift = 0.5 * (a + b);
        Self {
            nodes: self.nodes.iter().map(|&t| scale * t + shift).collect(),
            weights: self.weights.iter().map(|&w| scale * w).collect(),
        }
    }

    /// Number of points in the rule.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the rule is empty (never true for a constructed rule).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Quadrature nodes.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Quadrature weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Integrate `f` with this rule.
    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_interval_length() {
        for n in [2, 8, 64, 1024] {
            let rule = GaussLegendre::new(n);
            let total: f64 = rule.weights().iter().sum();
            assert_relative_eq!(total, 2.0, epsilon = 1e-12);

            let mapped = rule.mapped(-8.0, 8.0);
            let total: f64 = mapped.weights().iter().sum();
            assert_relative_eq!(total, 16.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_two_point_rule_is_exact() {
        let rule = GaussLegendre::new(2);
        // Known nodes ±1/√3, weights 1.
        assert_relative_eq!(rule.nodes()[1], 1.0 / 3.0_f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(rule.weights()[0], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_polynomial_exactness() {
        // A 5-point rule integrates degree-9 polynomials exactly.
        let rule = GaussLegendre::new(5);
        let integral = rule.integrate(|x| x.powi(8));
        assert_relative_eq!(integral, 2.0 / 9.0, epsilon = 1e-13);

        let odd = rule.integrate(|x| x.powi(7));
        assert!(odd.abs() < 1e-15);
    }

    #[test]
    fn test_mapped_interval() {
        let rule = GaussLegendre::new(32).mapped(0.0, 2.0);
        let integral = rule.integrate(|x| x.exp());
        assert_relative_eq!(integral, 2.0_f64.exp() - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_integral_on_truncated_domain() {
        // ∫ φ(x) dx over [-8, 8] is 1 to within the truncation error.
        let rule = GaussLegendre::new(1024).mapped(-8.0, 8.0);
        let integral = rule.integrate(|x| (-0.5 * x * x).exp() / (2.0 * PI).sqrt());
        assert_relative_eq!(integral, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nodes_sorted_and_symmetric() {
        let rule = GaussLegendre::new(101);
        let nodes = rule.nodes();
        for pair in nodes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for i in 0..nodes.len() {
            assert_relative_eq!(nodes[i], -nodes[nodes.len() - 1 - i], epsilon = 1e-14);
        }
    }
}
