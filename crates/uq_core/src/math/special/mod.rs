//! Special functions backing the marginal-distribution library.
//!
//! - Error function family and standard-normal helpers ([`erf`], [`erfc`],
//!   [`norm_pdf`], [`norm_cdf`], [`norm_icdf`])
//! - Log-gamma and the regularized incomplete gamma function with its
//!   inverse ([`ln_gamma`], [`gamma_p`], [`gamma_q`], [`gamma_p_inv`])
//! - The regularized incomplete beta function with its inverse
//!   ([`ln_beta`], [`beta_inc`], [`beta_inc_inv`])
//!
//! Implementations use series expansions and modified-Lentz continued
//! fractions, switching representation at the usual crossover points so the
//! complement is always formed without cancellation.

mod beta;
mod erf;
mod gamma;

pub use beta::{beta_inc, beta_inc_inv, ln_beta};
pub use erf::{erf, erfc, norm_cdf, norm_icdf, norm_pdf};
pub use gamma::{gamma_p, gamma_p_inv, gamma_q, ln_gamma};
