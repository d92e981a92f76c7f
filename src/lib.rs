#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! The crate `simpsonir` provides deterministic [numerical integration] routines based on a
//! tensor-product extension of the composite [Simpson rule], which approximate definite
//! multi-dimensional integrals over axis-aligned boxes.
//!
//! # Features
//!
//! This library was designed with the following features as essential in mind:
//!
//! - **Generic numeric type**. The numeric type used in this library is not fixed, but instead a
//! generic parameter, so that the integration routines can be used with either `f32`, `f64`, or a
//! custom numeric type that implements the `Float` trait from the `num-traits` crate.
//! - **Reproducibility**. The sequential evaluator walks the integration grid in a fixed order, so
//! its results are bit-for-bit reproducible across runs. The parallel evaluator combines worker
//! partial sums in an unspecified order and therefore agrees with the sequential one only up to
//! floating-point summation error.
//! - **Fail-fast validation**. Mismatched dimensions, inverted interval borders, zero subdivision
//! counts and grids too large to enumerate are rejected with a descriptive error before any
//! integrand evaluation takes place.
//! - **Non-finite tracking**. Integrands sometimes produce `inf` or `nan` in extreme regions of
//! their domain. Such values are not filtered, they propagate arithmetically into the sum, but a
//! counter keeps track of how often this happened.
//!
//! # What is ...?
//!
//! This section is a dictionary of terms that are used in this documentation. Given
//!
//! $$ I = \int_{a_1}^{b_1} \mathrm{d} x_1 \cdots \int_{a_d}^{b_d} \mathrm{d} x_d
//! f(x_1, x_2, \ldots, x_d) $$
//!
//! we approximate $I$ by splitting dimension $i$ into $n_i$ equal subintervals of width
//! $h_i = (b_i - a_i) / n_i$ and applying, per cell and per dimension, the 1-4-1 Simpson weights
//! to the cell's left border, center and right border. We use the following terms:
//!
//! - the *region* is the axis-aligned box $[a_1, b_1] \times \cdots \times [a_d, b_d]$;
//! - the *subdivision* is the vector $(n_1, \ldots, n_d)$ of per-dimension cell counts;
//! - a *cell* is one of the $\prod_i n_i$ sub-boxes the subdivision induces;
//! - the *integrand* is the function, $f(x_1, x_2, \ldots, x_d)$, that is being integrated;
//! - the number of *dimensions*, $d$, is the number of dimensions of the integration domain;
//! - the number of *calls* is the number of times the integrand is evaluated, which is
//! $6^d \prod_i n_i$. We assume that the integrand evaluation is the expensive operation.
//!
//! The rule is exact for polynomials up to degree 3 in every dimension separately.
//!
//! [numerical integration]: https://en.wikipedia.org/wiki/Numerical_integration
//! [Simpson rule]: https://en.wikipedia.org/wiki/Simpson%27s_rule

pub mod callbacks;
pub mod core;
pub mod integrators;

pub use crate::core::*;
