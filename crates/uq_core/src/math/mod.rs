//! Numerical building blocks: root finding, special functions, quadrature.

pub mod quadrature;
pub mod solvers;
pub mod special;
