//! Parametric marginal distributions.
//!
//! The [`Marginal`] enum covers the continuous families used in
//! uncertainty-quantification models plus two degenerate ones (point masses
//! and finite discrete supports). Every family exposes density, log-density,
//! CDF, quantile, moments and inverse-CDF sampling through a uniform
//! interface, so downstream code can treat a vector of marginals
//! generically.
//!
//! Parameters are validated once at construction; evaluation methods never
//! fail for a successfully constructed distribution.

mod error;
mod mvnormal;

pub use error::DistributionError;
pub use mvnormal::MultivariateNormal;

use rand::distributions::Open01;
use rand::Rng;
use rand_distr::StandardNormal;
use uq_core::math::special::{
    beta_inc, beta_inc_inv, gamma_p, gamma_p_inv, gamma_q, ln_beta, ln_gamma, norm_cdf, norm_icdf,
    norm_pdf,
};

/// ln(sqrt(2 * pi))
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// `a * ln(y)` with the convention `0 * ln(0) = 0`.
#[inline]
fn xlogy(a: f64, y: f64) -> f64 {
    if a == 0.0 {
        0.0
    } else {
        a * y.ln()
    }
}

/// A univariate marginal distribution.
///
/// Construct instances through the family constructors ([`Marginal::normal`],
/// [`Marginal::lognormal`], ...), which validate parameters and return
/// [`DistributionError`] on inconsistent input. The variant fields are public
/// so callers can pattern-match, but bypassing the constructors skips
/// validation.
///
/// # Examples
/// ```
/// use uq_nataf::marginal::Marginal;
///
/// let m = Marginal::gamma(2.0, 0.5).unwrap();
/// assert!((m.mean() - 4.0).abs() < 1e-12);
/// assert!((m.cdf(m.icdf(0.3)) - 0.3).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum Marginal {
    /// Continuous uniform on `[lower, upper]`.
    Uniform {
        /// Lower bound of the support
        lower: f64,
        /// Upper bound of the support
        upper: f64,
    },
    /// Gaussian with the given mean and standard deviation.
    Normal {
        /// Mean
        mean: f64,
        /// Standard deviation, positive
        std_dev: f64,
    },
    /// Half-normal: the absolute value of a centered Gaussian.
    HalfNormal {
        /// Scale of the underlying Gaussian, positive
        scale: f64,
    },
    /// Gaussian restricted to `[lower, upper]` and renormalized.
    TruncatedNormal {
        /// Mean of the parent Gaussian
        mean: f64,
        /// Standard deviation of the parent Gaussian, positive
        std_dev: f64,
        /// Lower truncation bound
        lower: f64,
        /// Upper truncation bound
        upper: f64,
    },
    /// Lognormal: `exp(N(mu, sigma^2))`.
    Lognormal {
        /// Mean of the underlying Gaussian
        mu: f64,
        /// Standard deviation of the underlying Gaussian, positive
        sigma: f64,
    },
    /// Beta distribution rescaled to the interval `[lower, upper]`.
    Beta {
        /// First shape parameter, positive
        alpha: f64,
        /// Second shape parameter, positive
        beta: f64,
        /// Lower bound of the support
        lower: f64,
        /// Upper bound of the support
        upper: f64,
    },
    /// Gamma distribution in shape/rate parametrization.
    Gamma {
        /// Shape, positive
        shape: f64,
        /// Rate (inverse scale), positive
        rate: f64,
    },
    /// Inverse-gamma distribution.
    InverseGamma {
        /// Shape, positive
        shape: f64,
        /// Scale, positive
        scale: f64,
    },
    /// Gumbel (type-I extreme value) distribution for maxima.
    Gumbel {
        /// Location of the mode
        location: f64,
        /// Scale, positive
        scale: f64,
    },
    /// Weibull distribution in shape/scale parametrization.
    Weibull {
        /// Shape, positive
        shape: f64,
        /// Scale, positive
        scale: f64,
    },
    /// Exponential distribution with the given rate.
    Exponential {
        /// Rate, positive
        rate: f64,
    },
    /// Exponential restricted to `[lower, upper]` and renormalized.
    TruncatedExponential {
        /// Rate of the parent exponential, positive
        rate: f64,
        /// Lower truncation bound
        lower: f64,
        /// Upper truncation bound
        upper: f64,
    },
    /// Chi-square distribution with `dof` degrees of freedom.
    ChiSquare {
        /// Degrees of freedom, positive
        dof: f64,
    },
    /// Finite discrete distribution over a set of real atoms.
    Discrete {
        /// Atom locations, sorted ascending
        values: Vec<f64>,
        /// Atom probabilities, aligned with `values`, summing to one
        probabilities: Vec<f64>,
    },
    /// Degenerate point mass.
    Constant {
        /// The single supported value
        value: f64,
    },
}

impl Marginal {
    /// Continuous uniform on `[lower, upper]`; requires `lower < upper`.
    pub fn uniform(lower: f64, upper: f64) -> Result<Self, DistributionError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(DistributionError::invalid(
                "uniform",
                format!("bounds must satisfy lower < upper, got [{lower}, {upper}]"),
            ));
        }
        Ok(Self::Uniform { lower, upper })
    }

    /// Gaussian with mean `mean` and standard deviation `std_dev > 0`.
    pub fn normal(mean: f64, std_dev: f64) -> Result<Self, DistributionError> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(DistributionError::invalid(
                "normal",
                format!("standard deviation must be positive, got {std_dev}"),
            ));
        }
        Ok(Self::Normal { mean, std_dev })
    }

    /// Half-normal with scale `scale > 0`.
    pub fn half_normal(scale: f64) -> Result<Self, DistributionError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DistributionError::invalid(
                "half-normal",
                format!("scale must be positive, got {scale}"),
            ));
        }
        Ok(Self::HalfNormal { scale })
    }

    /// Gaussian truncated to `[lower, upper]`.
    ///
    /// Requires `std_dev > 0`, `lower < upper`, and a truncation interval
    /// carrying non-negligible probability mass under the parent Gaussian.
    pub fn truncated_normal(
        mean: f64,
        std_dev: f64,
        lower: f64,
        upper: f64,
    ) -> Result<Self, DistributionError> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(DistributionError::invalid(
                "truncated normal",
                format!("standard deviation must be positive, got {std_dev}"),
            ));
        }
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(DistributionError::invalid(
                "truncated normal",
                format!("bounds must satisfy lower < upper, got [{lower}, {upper}]"),
            ));
        }
        let mass = norm_cdf((upper - mean) / std_dev) - norm_cdf((lower - mean) / std_dev);
        if mass <= 0.0 {
            return Err(DistributionError::invalid(
                "truncated normal",
                "truncation interval carries no probability mass".to_string(),
            ));
        }
        Ok(Self::TruncatedNormal {
            mean,
            std_dev,
            lower,
            upper,
        })
    }

    /// Lognormal: `exp(N(mu, sigma^2))` with `sigma > 0`.
    pub fn lognormal(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::invalid(
                "lognormal",
                format!("log-space standard deviation must be positive, got {sigma}"),
            ));
        }
        Ok(Self::Lognormal { mu, sigma })
    }

    /// Beta distribution with shapes `alpha, beta > 0` on `[lower, upper]`.
    pub fn beta(alpha: f64, beta: f64, lower: f64, upper: f64) -> Result<Self, DistributionError> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return Err(DistributionError::invalid(
                "beta",
                format!("shape parameters must be positive, got alpha = {alpha}, beta = {beta}"),
            ));
        }
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(DistributionError::invalid(
                "beta",
                format!("bounds must satisfy lower < upper, got [{lower}, {upper}]"),
            ));
        }
        Ok(Self::Beta {
            alpha,
            beta,
            lower,
            upper,
        })
    }

    /// Gamma distribution with `shape > 0` and `rate > 0`.
    pub fn gamma(shape: f64, rate: f64) -> Result<Self, DistributionError> {
        if !shape.is_finite() || !rate.is_finite() || shape <= 0.0 || rate <= 0.0 {
            return Err(DistributionError::invalid(
                "gamma",
                format!("shape and rate must be positive, got shape = {shape}, rate = {rate}"),
            ));
        }
        Ok(Self::Gamma { shape, rate })
    }

    /// Inverse-gamma distribution with `shape > 0` and `scale > 0`.
    ///
    /// The mean is finite only for `shape > 1` and the variance only for
    /// `shape > 2`; [`Marginal::mean`] and [`Marginal::std_dev`] return
    /// `+inf` otherwise.
    pub fn inverse_gamma(shape: f64, scale: f64) -> Result<Self, DistributionError> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return Err(DistributionError::invalid(
                "inverse gamma",
                format!("shape and scale must be positive, got shape = {shape}, scale = {scale}"),
            ));
        }
        Ok(Self::InverseGamma { shape, scale })
    }

    /// Gumbel distribution with the given mode location and `scale > 0`.
    pub fn gumbel(location: f64, scale: f64) -> Result<Self, DistributionError> {
        if !location.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return Err(DistributionError::invalid(
                "gumbel",
                format!("scale must be positive, got {scale}"),
            ));
        }
        Ok(Self::Gumbel { location, scale })
    }

    /// Weibull distribution with `shape > 0` and `scale > 0`.
    pub fn weibull(shape: f64, scale: f64) -> Result<Self, DistributionError> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return Err(DistributionError::invalid(
                "weibull",
                format!("shape and scale must be positive, got shape = {shape}, scale = {scale}"),
            ));
        }
        Ok(Self::Weibull { shape, scale })
    }

    /// Exponential distribution with `rate > 0`.
    pub fn exponential(rate: f64) -> Result<Self, DistributionError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DistributionError::invalid(
                "exponential",
                format!("rate must be positive, got {rate}"),
            ));
        }
        Ok(Self::Exponential { rate })
    }

    /// Exponential truncated to `[lower, upper]` with `rate > 0`.
    pub fn truncated_exponential(
        rate: f64,
        lower: f64,
        upper: f64,
    ) -> Result<Self, DistributionError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DistributionError::invalid(
                "truncated exponential",
                format!("rate must be positive, got {rate}"),
            ));
        }
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(DistributionError::invalid(
                "truncated exponential",
                format!("bounds must satisfy lower < upper, got [{lower}, {upper}]"),
            ));
        }
        Ok(Self::TruncatedExponential { rate, lower, upper })
    }

    /// Chi-square distribution with `dof > 0` degrees of freedom.
    pub fn chi_square(dof: f64) -> Result<Self, DistributionError> {
        if !dof.is_finite() || dof <= 0.0 {
            return Err(DistributionError::invalid(
                "chi-square",
                format!("degrees of freedom must be positive, got {dof}"),
            ));
        }
        Ok(Self::ChiSquare { dof })
    }

    /// Finite discrete distribution over `values` with the given `weights`.
    ///
    /// Weights must be positive but need not sum to one; they are
    /// normalized. Atoms are sorted ascending and must be distinct.
    pub fn discrete(values: &[f64], weights: &[f64]) -> Result<Self, DistributionError> {
        if values.is_empty() || values.len() != weights.len() {
            return Err(DistributionError::invalid(
                "discrete",
                format!(
                    "need matching non-empty values and weights, got {} values and {} weights",
                    values.len(),
                    weights.len()
                ),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DistributionError::invalid(
                "discrete",
                "all atom values must be finite".to_string(),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(DistributionError::invalid(
                "discrete",
                "all weights must be positive and finite".to_string(),
            ));
        }

        let mut pairs: Vec<(f64, f64)> = values.iter().copied().zip(weights.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(DistributionError::invalid(
                "discrete",
                "atom values must be distinct".to_string(),
            ));
        }

        let total: f64 = pairs.iter().map(|(_, w)| w).sum();
        let values = pairs.iter().map(|(v, _)| *v).collect();
        let probabilities = pairs.iter().map(|(_, w)| w / total).collect();
        Ok(Self::Discrete {
            values,
            probabilities,
        })
    }

    /// Degenerate point mass at `value`.
    pub fn constant(value: f64) -> Result<Self, DistributionError> {
        if !value.is_finite() {
            return Err(DistributionError::invalid(
                "constant",
                format!("value must be finite, got {value}"),
            ));
        }
        Ok(Self::Constant { value })
    }

    /// Human-readable family name, matching the constructor vocabulary.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "uniform",
            Self::Normal { .. } => "normal",
            Self::HalfNormal { .. } => "half-normal",
            Self::TruncatedNormal { .. } => "truncated normal",
            Self::Lognormal { .. } => "lognormal",
            Self::Beta { .. } => "beta",
            Self::Gamma { .. } => "gamma",
            Self::InverseGamma { .. } => "inverse gamma",
            Self::Gumbel { .. } => "gumbel",
            Self::Weibull { .. } => "weibull",
            Self::Exponential { .. } => "exponential",
            Self::TruncatedExponential { .. } => "truncated exponential",
            Self::ChiSquare { .. } => "chi-square",
            Self::Discrete { .. } => "discrete",
            Self::Constant { .. } => "constant",
        }
    }

    /// `true` for families with a density with respect to Lebesgue measure.
    ///
    /// Discrete and constant marginals are the exceptions; joint density and
    /// forward-transform operations reject them.
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Discrete { .. } | Self::Constant { .. })
    }

    /// Mean of the distribution.
    ///
    /// Returns `+inf` for inverse-gamma shapes `<= 1`, where the first
    /// moment diverges.
    pub fn mean(&self) -> f64 {
        match self {
            Self::Uniform { lower, upper } => 0.5 * (lower + upper),
            Self::Normal { mean, .. } => *mean,
            Self::HalfNormal { scale } => scale * (2.0 / std::f64::consts::PI).sqrt(),
            Self::TruncatedNormal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                let a = (lower - mean) / std_dev;
                let b = (upper - mean) / std_dev;
                let z = norm_cdf(b) - norm_cdf(a);
                mean + std_dev * (norm_pdf(a) - norm_pdf(b)) / z
            }
            Self::Lognormal { mu, sigma } => (mu + 0.5 * sigma * sigma).exp(),
            Self::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => lower + (upper - lower) * alpha / (alpha + beta),
            Self::Gamma { shape, rate } => shape / rate,
            Self::InverseGamma { shape, scale } => {
                if *shape > 1.0 {
                    scale / (shape - 1.0)
                } else {
                    f64::INFINITY
                }
            }
            Self::Gumbel { location, scale } => location + EULER_GAMMA * scale,
            Self::Weibull { shape, scale } => scale * ln_gamma(1.0 + 1.0 / shape).exp(),
            Self::Exponential { rate } => 1.0 / rate,
            Self::TruncatedExponential { rate, lower, upper } => {
                let c = upper - lower;
                let q = -(-rate * c).exp_m1();
                lower + 1.0 / rate - c * (-rate * c).exp() / q
            }
            Self::ChiSquare { dof } => *dof,
            Self::Discrete {
                values,
                probabilities,
            } => values.iter().zip(probabilities).map(|(v, p)| v * p).sum(),
            Self::Constant { value } => *value,
        }
    }

    /// Standard deviation of the distribution.
    ///
    /// Returns `+inf` for inverse-gamma shapes `<= 2`, where the second
    /// moment diverges. Constants have standard deviation zero.
    pub fn std_dev(&self) -> f64 {
        match self {
            Self::Uniform { lower, upper } => (upper - lower) / 12.0_f64.sqrt(),
            Self::Normal { std_dev, .. } => *std_dev,
            Self::HalfNormal { scale } => scale * (1.0 - 2.0 / std::f64::consts::PI).sqrt(),
            Self::TruncatedNormal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                let a = (lower - mean) / std_dev;
                let b = (upper - mean) / std_dev;
                let z = norm_cdf(b) - norm_cdf(a);
                let r = (norm_pdf(a) - norm_pdf(b)) / z;
                let var = 1.0 + (a * norm_pdf(a) - b * norm_pdf(b)) / z - r * r;
                std_dev * var.max(0.0).sqrt()
            }
            Self::Lognormal { mu, sigma } => {
                let s2 = sigma * sigma;
                (mu + 0.5 * s2).exp() * s2.exp_m1().sqrt()
            }
            Self::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => {
                let s = alpha + beta;
                (upper - lower) * (alpha * beta / (s * s * (s + 1.0))).sqrt()
            }
            Self::Gamma { shape, rate } => shape.sqrt() / rate,
            Self::InverseGamma { shape, scale } => {
                if *shape > 2.0 {
                    scale / ((shape - 1.0) * (shape - 2.0).sqrt())
                } else {
                    f64::INFINITY
                }
            }
            Self::Gumbel { scale, .. } => scale * std::f64::consts::PI / 6.0_f64.sqrt(),
            Self::Weibull { shape, scale } => {
                let m1 = ln_gamma(1.0 + 1.0 / shape).exp();
                let m2 = ln_gamma(1.0 + 2.0 / shape).exp();
                scale * (m2 - m1 * m1).max(0.0).sqrt()
            }
            Self::Exponential { rate } => 1.0 / rate,
            Self::TruncatedExponential { rate, lower, upper } => {
                let c = upper - lower;
                let e = (-rate * c).exp();
                let q = 1.0 - e;
                let m1 = 1.0 / rate - c * e / q;
                let m2 = (2.0 / (rate * rate) - (c * c + 2.0 * c / rate + 2.0 / (rate * rate)) * e)
                    / q;
                (m2 - m1 * m1).max(0.0).sqrt()
            }
            Self::ChiSquare { dof } => (2.0 * dof).sqrt(),
            Self::Discrete {
                values,
                probabilities,
            } => {
                let m: f64 = values.iter().zip(probabilities).map(|(v, p)| v * p).sum();
                let v: f64 = values
                    .iter()
                    .zip(probabilities)
                    .map(|(v, p)| p * (v - m) * (v - m))
                    .sum();
                v.sqrt()
            }
            Self::Constant { .. } => 0.0,
        }
    }

    /// Probability density at `x` (probability mass for discrete atoms).
    ///
    /// Zero outside the support. Point masses report density one
    /// everywhere, so a constant component contributes a neutral factor to
    /// product densities.
    pub fn pdf(&self, x: f64) -> f64 {
        self.log_pdf(x).exp()
    }

    /// Natural logarithm of the density at `x`.
    ///
    /// Returns `-inf` outside the support; may return `+inf` at an
    /// integrable singularity (e.g. a gamma density with shape below one at
    /// the origin). Never returns NaN for finite `x`.
    pub fn log_pdf(&self, x: f64) -> f64 {
        match self {
            Self::Uniform { lower, upper } => {
                if x < *lower || x > *upper {
                    f64::NEG_INFINITY
                } else {
                    -(upper - lower).ln()
                }
            }
            Self::Normal { mean, std_dev } => {
                let z = (x - mean) / std_dev;
                -0.5 * z * z - std_dev.ln() - LN_SQRT_2PI
            }
            Self::HalfNormal { scale } => {
                if x < 0.0 {
                    f64::NEG_INFINITY
                } else {
                    let z = x / scale;
                    -0.5 * z * z - scale.ln() - LN_SQRT_2PI + std::f64::consts::LN_2
                }
            }
            Self::TruncatedNormal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                if x < *lower || x > *upper {
                    return f64::NEG_INFINITY;
                }
                let a = (lower - mean) / std_dev;
                let b = (upper - mean) / std_dev;
                let z = norm_cdf(b) - norm_cdf(a);
                let t = (x - mean) / std_dev;
                -0.5 * t * t - std_dev.ln() - LN_SQRT_2PI - z.ln()
            }
            Self::Lognormal { mu, sigma } => {
                if x <= 0.0 {
                    return f64::NEG_INFINITY;
                }
                let z = (x.ln() - mu) / sigma;
                -0.5 * z * z - x.ln() - sigma.ln() - LN_SQRT_2PI
            }
            Self::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => {
                if x < *lower || x > *upper {
                    return f64::NEG_INFINITY;
                }
                let w = upper - lower;
                let y = (x - lower) / w;
                xlogy(alpha - 1.0, y) + xlogy(beta - 1.0, 1.0 - y) - ln_beta(*alpha, *beta)
                    - w.ln()
            }
            Self::Gamma { shape, rate } => {
                if x < 0.0 {
                    return f64::NEG_INFINITY;
                }
                shape * rate.ln() + xlogy(shape - 1.0, x) - rate * x - ln_gamma(*shape)
            }
            Self::InverseGamma { shape, scale } => {
                if x <= 0.0 {
                    return f64::NEG_INFINITY;
                }
                shape * scale.ln() - ln_gamma(*shape) - (shape + 1.0) * x.ln() - scale / x
            }
            Self::Gumbel { location, scale } => {
                let z = (x - location) / scale;
                -scale.ln() - z - (-z).exp()
            }
            Self::Weibull { shape, scale } => {
                if x < 0.0 {
                    return f64::NEG_INFINITY;
                }
                let y = x / scale;
                shape.ln() - scale.ln() + xlogy(shape - 1.0, y) - y.powf(*shape)
            }
            Self::Exponential { rate } => {
                if x < 0.0 {
                    f64::NEG_INFINITY
                } else {
                    rate.ln() - rate * x
                }
            }
            Self::TruncatedExponential { rate, lower, upper } => {
                if x < *lower || x > *upper {
                    return f64::NEG_INFINITY;
                }
                let q = -(-rate * (upper - lower)).exp_m1();
                rate.ln() - rate * (x - lower) - q.ln()
            }
            Self::ChiSquare { dof } => {
                if x < 0.0 {
                    return f64::NEG_INFINITY;
                }
                let k = 0.5 * dof;
                -k * std::f64::consts::LN_2 + xlogy(k - 1.0, x) - 0.5 * x - ln_gamma(k)
            }
            Self::Discrete {
                values,
                probabilities,
            } => {
                for (v, p) in values.iter().zip(probabilities) {
                    if *v == x {
                        return p.ln();
                    }
                }
                f64::NEG_INFINITY
            }
            Self::Constant { .. } => 0.0,
        }
    }

    /// Cumulative distribution function at `x`, monotone from 0 to 1.
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Uniform { lower, upper } => ((x - lower) / (upper - lower)).clamp(0.0, 1.0),
            Self::Normal { mean, std_dev } => norm_cdf((x - mean) / std_dev),
            Self::HalfNormal { scale } => {
                if x <= 0.0 {
                    0.0
                } else {
                    2.0 * norm_cdf(x / scale) - 1.0
                }
            }
            Self::TruncatedNormal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                let a = (lower - mean) / std_dev;
                let b = (upper - mean) / std_dev;
                let z = norm_cdf(b) - norm_cdf(a);
                ((norm_cdf((x - mean) / std_dev) - norm_cdf(a)) / z).clamp(0.0, 1.0)
            }
            Self::Lognormal { mu, sigma } => {
                if x <= 0.0 {
                    0.0
                } else {
                    norm_cdf((x.ln() - mu) / sigma)
                }
            }
            Self::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => {
                let y = ((x - lower) / (upper - lower)).clamp(0.0, 1.0);
                beta_inc(*alpha, *beta, y).unwrap_or(f64::NAN)
            }
            Self::Gamma { shape, rate } => {
                if x <= 0.0 {
                    0.0
                } else {
                    gamma_p(*shape, rate * x).unwrap_or(f64::NAN)
                }
            }
            Self::InverseGamma { shape, scale } => {
                if x <= 0.0 {
                    0.0
                } else {
                    gamma_q(*shape, scale / x).unwrap_or(f64::NAN)
                }
            }
            Self::Gumbel { location, scale } => (-(-(x - location) / scale).exp()).exp(),
            Self::Weibull { shape, scale } => {
                if x <= 0.0 {
                    0.0
                } else {
                    -(-(x / scale).powf(*shape)).exp_m1()
                }
            }
            Self::Exponential { rate } => {
                if x <= 0.0 {
                    0.0
                } else {
                    -(-rate * x).exp_m1()
                }
            }
            Self::TruncatedExponential { rate, lower, upper } => {
                let q = -(-rate * (upper - lower)).exp_m1();
                ((-(-rate * (x - lower)).exp_m1()) / q).clamp(0.0, 1.0)
            }
            Self::ChiSquare { dof } => {
                if x <= 0.0 {
                    0.0
                } else {
                    gamma_p(0.5 * dof, 0.5 * x).unwrap_or(f64::NAN)
                }
            }
            Self::Discrete {
                values,
                probabilities,
            } => values
                .iter()
                .zip(probabilities)
                .filter(|(v, _)| **v <= x)
                .map(|(_, p)| p)
                .sum(),
            Self::Constant { value } => {
                if x < *value {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    /// Quantile function: the smallest `x` with `cdf(x) >= p`.
    ///
    /// Arguments outside `(0, 1)` map to the support boundary, which is
    /// infinite for unbounded families.
    pub fn icdf(&self, p: f64) -> f64 {
        match self {
            Self::Uniform { lower, upper } => lower + p.clamp(0.0, 1.0) * (upper - lower),
            Self::Normal { mean, std_dev } => mean + std_dev * norm_icdf(p),
            Self::HalfNormal { scale } => {
                if p <= 0.0 {
                    0.0
                } else {
                    scale * norm_icdf(0.5 * (1.0 + p.min(1.0)))
                }
            }
            Self::TruncatedNormal {
                mean,
                std_dev,
                lower,
                upper,
            } => {
                if p <= 0.0 {
                    return *lower;
                }
                if p >= 1.0 {
                    return *upper;
                }
                let a = (lower - mean) / std_dev;
                let b = (upper - mean) / std_dev;
                let fa = norm_cdf(a);
                let z = norm_cdf(b) - fa;
                (mean + std_dev * norm_icdf(fa + p * z)).clamp(*lower, *upper)
            }
            Self::Lognormal { mu, sigma } => {
                if p <= 0.0 {
                    0.0
                } else {
                    (mu + sigma * norm_icdf(p)).exp()
                }
            }
            Self::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => lower + (upper - lower) * beta_inc_inv(*alpha, *beta, p).unwrap_or(f64::NAN),
            Self::Gamma { shape, rate } => {
                if p >= 1.0 {
                    f64::INFINITY
                } else {
                    gamma_p_inv(*shape, p).unwrap_or(f64::NAN) / rate
                }
            }
            Self::InverseGamma { shape, scale } => {
                if p <= 0.0 {
                    0.0
                } else if p >= 1.0 {
                    f64::INFINITY
                } else {
                    scale / gamma_p_inv(*shape, 1.0 - p).unwrap_or(f64::NAN)
                }
            }
            Self::Gumbel { location, scale } => {
                if p <= 0.0 {
                    f64::NEG_INFINITY
                } else if p >= 1.0 {
                    f64::INFINITY
                } else {
                    location - scale * (-p.ln()).ln()
                }
            }
            Self::Weibull { shape, scale } => {
                if p >= 1.0 {
                    f64::INFINITY
                } else {
                    scale * (-(-p.clamp(0.0, 1.0)).ln_1p()).powf(1.0 / shape)
                }
            }
            Self::Exponential { rate } => {
                if p >= 1.0 {
                    f64::INFINITY
                } else {
                    -(-p.clamp(0.0, 1.0)).ln_1p() / rate
                }
            }
            Self::TruncatedExponential { rate, lower, upper } => {
                if p <= 0.0 {
                    return *lower;
                }
                if p >= 1.0 {
                    return *upper;
                }
                let q = -(-rate * (upper - lower)).exp_m1();
                (lower - (-p * q).ln_1p() / rate).clamp(*lower, *upper)
            }
            Self::ChiSquare { dof } => {
                if p >= 1.0 {
                    f64::INFINITY
                } else {
                    2.0 * gamma_p_inv(0.5 * dof, p).unwrap_or(f64::NAN)
                }
            }
            Self::Discrete {
                values,
                probabilities,
            } => step_to_atom(values, probabilities, p),
            Self::Constant { value } => *value,
        }
    }

    /// Draw one sample.
    ///
    /// Normal-family marginals use the generator's Gaussian sampler
    /// directly; all other continuous families go through the quantile
    /// function with an open-interval uniform draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Normal { mean, std_dev } => {
                let z: f64 = rng.sample(StandardNormal);
                mean + std_dev * z
            }
            Self::HalfNormal { scale } => {
                let z: f64 = rng.sample(StandardNormal);
                scale * z.abs()
            }
            Self::Lognormal { mu, sigma } => {
                let z: f64 = rng.sample(StandardNormal);
                (mu + sigma * z).exp()
            }
            Self::Discrete {
                values,
                probabilities,
            } => step_to_atom(values, probabilities, rng.gen::<f64>()),
            Self::Constant { value } => *value,
            _ => {
                let p: f64 = rng.sample(Open01);
                self.icdf(p)
            }
        }
    }

    /// Map a standard-normal coordinate `u` to physical space.
    ///
    /// For continuous families this is `icdf(Phi(u))`; discrete marginals
    /// step through their atoms at the probability `Phi(u)`, and constants
    /// ignore `u` entirely.
    pub fn physical_from_standard_normal(&self, u: f64) -> f64 {
        match self {
            Self::Normal { mean, std_dev } => mean + std_dev * u,
            Self::Lognormal { mu, sigma } => (mu + sigma * u).exp(),
            Self::Discrete {
                values,
                probabilities,
            } => step_to_atom(values, probabilities, norm_cdf(u)),
            Self::Constant { value } => *value,
            _ => self.icdf(norm_cdf(u)),
        }
    }
}

/// Walk the cumulative weights until they cover `p` and return that atom.
fn step_to_atom(values: &[f64], probabilities: &[f64], p: f64) -> f64 {
    let mut acc = 0.0;
    for (v, w) in values.iter().zip(probabilities) {
        acc += w;
        if p <= acc {
            return *v;
        }
    }
    values[values.len() - 1]
}
