//! Precision chosen at run time.
//!
//! Configuration files name their precision as a [`Dtype`] string, so the
//! evaluator type cannot be fixed at compile time. [`AnyCost`] wraps one
//! concrete evaluator per precision and widens results to `f64`.

use super::eq::{SquaredExponentialCost, DEFAULT_EQ_COST_NAME};
use super::error::CostResult;
use super::Cost;
use crate::dtype::Dtype;
use crate::input::NdArray;

#[derive(Debug, Clone, PartialEq)]
pub enum AnyCost {
    Float32(SquaredExponentialCost<f32>),
    Float64(SquaredExponentialCost<f64>),
}

impl AnyCost {
    /// Build a squared-exponential cost computing at `dtype`.
    pub fn squared_exponential(
        dtype: Dtype,
        target_loc: &NdArray<f64>,
        target_scale: &NdArray<f64>,
        name: Option<&str>,
    ) -> CostResult<Self> {
        let name = name.unwrap_or(DEFAULT_EQ_COST_NAME);
        let cost = match dtype {
            Dtype::Float32 => {
                AnyCost::Float32(SquaredExponentialCost::named(name, target_loc, target_scale)?)
            }
            Dtype::Float64 => {
                AnyCost::Float64(SquaredExponentialCost::named(name, target_loc, target_scale)?)
            }
        };
        Ok(cost)
    }

    pub fn name(&self) -> &str {
        match self {
            AnyCost::Float32(c) => c.name(),
            AnyCost::Float64(c) => c.name(),
        }
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            AnyCost::Float32(c) => c.dtype(),
            AnyCost::Float64(c) => c.dtype(),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            AnyCost::Float32(c) => c.dimension(),
            AnyCost::Float64(c) => c.dimension(),
        }
    }

    /// Expected cost under `N(loc, cov)`, widened to `f64`.
    pub fn expected_cost(&self, loc: &NdArray<f64>, cov: &NdArray<f64>) -> CostResult<f64> {
        match self {
            AnyCost::Float32(c) => c.expected_cost(loc, cov).map(f64::from),
            AnyCost::Float64(c) => c.expected_cost(loc, cov),
        }
    }

    /// Point-mass cost at `loc`, widened to `f64`.
    pub fn call(&self, loc: &NdArray<f64>) -> CostResult<f64> {
        match self {
            AnyCost::Float32(c) => c.call(loc).map(f64::from),
            AnyCost::Float64(c) => c.call(loc),
        }
    }
}
