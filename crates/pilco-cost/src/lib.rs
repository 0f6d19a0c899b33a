//! Expected-cost evaluation for PILCO-style model-based control.
//!
//! A controller that plans under a Gaussian belief over the system state needs
//! the *expected* cost of that belief, not the cost of a single sample. For a
//! squared-exponential cost the expectation has a closed form, which is what
//! [`SquaredExponentialCost`] evaluates:
//!
//! ```text
//! E[cost] = 1 - exp(-1/2 (x - t)ᵀ (Σ + s²I)⁻¹ (x - t)) / sqrt(det(I + Σ / s²))
//! ```
//!
//! where `x` is the belief mean, `Σ` the belief covariance, `t` the target
//! location and `s` the target scale.
//!
//! # Example
//!
//! ```
//! use pilco_cost::{Cost, SquaredExponentialCost};
//!
//! let cost = SquaredExponentialCost::<f64>::new(vec![vec![0.0, 0.0]], 1.0)?;
//!
//! // Point-mass belief sitting on the target costs nothing.
//! assert!(cost.call(vec![vec![0.0, 0.0]])?.abs() < 1e-12);
//!
//! // Uncertainty alone raises the expected cost.
//! let spread = cost.expected_cost(vec![vec![0.0, 0.0]], vec![vec![0.5, 0.0], vec![0.0, 0.5]])?;
//! assert!(spread > 0.0 && spread < 1.0);
//! assert_eq!(cost.name(), "eq_cost");
//! # Ok::<(), pilco_cost::CostError>(())
//! ```

pub mod cost;
pub mod dtype;
pub mod input;

pub use cost::any::AnyCost;
pub use cost::eq::{EqCost, SquaredExponentialCost, DEFAULT_EQ_COST_NAME};
pub use cost::error::{CostError, CostErrorKind, CostResult, LocationRole};
pub use cost::Cost;
pub use dtype::{Dtype, Precision};
pub use input::{IntoArray, NdArray, Shape};

pub use nalgebra::DMatrix;
