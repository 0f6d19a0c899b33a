//! Squared-exponential (EQ) cost.
//!
//! The per-state cost is `1 - exp(-1/2 ‖x - t‖² / s²)`: zero at the target `t`
//! and saturating towards one with distance, at a rate set by the target
//! scale `s`. Under a Gaussian belief `x ~ N(μ, Σ)` its expectation is
//!
//! ```text
//! E[cost] = 1 - exp(-1/2 (μ - t)ᵀ (Σ + s²I)⁻¹ (μ - t)) / sqrt(det(I + Σ / s²))
//! ```
//!
//! The quadratic form uses an LU solve rather than an explicit inverse.

use nalgebra::{DMatrix, Scalar};
use num_traits::ToPrimitive;
use tracing::{debug, trace, warn};

use super::error::{CostError, CostResult, LocationRole};
use super::{check_covariance, covariance_matrix, location_dim, location_matrix, Cost};
use crate::dtype::Precision;
use crate::input::{cast_value, IntoArray};

/// Name used when none is given.
pub const DEFAULT_EQ_COST_NAME: &str = "eq_cost";

/// Expected squared-exponential cost around a fixed target.
///
/// The target location (`1 x D`) and scale are fixed at construction; every
/// evaluation is independent, so one instance can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SquaredExponentialCost<T: Precision> {
    name: String,
    target_loc: DMatrix<T>,
    target_scale: T,
}

/// Short alias.
pub type EqCost<T> = SquaredExponentialCost<T>;

impl<T: Precision> SquaredExponentialCost<T> {
    /// Create a cost centered on `target_loc` with width `target_scale`.
    ///
    /// `target_loc` must be a `1 x D` array. `target_scale` may be a scalar or
    /// any one-element array and must be positive and finite. Both are cast to
    /// precision `T`.
    pub fn new<L, S, C, U>(target_loc: L, target_scale: C) -> CostResult<Self>
    where
        L: IntoArray<S>,
        S: Scalar + ToPrimitive,
        C: IntoArray<U>,
        U: Scalar + ToPrimitive,
    {
        Self::named(DEFAULT_EQ_COST_NAME, target_loc, target_scale)
    }

    /// Like [`new`](Self::new), with an explicit instance name.
    pub fn named<L, S, C, U>(
        name: impl Into<String>,
        target_loc: L,
        target_scale: C,
    ) -> CostResult<Self>
    where
        L: IntoArray<S>,
        S: Scalar + ToPrimitive,
        C: IntoArray<U>,
        U: Scalar + ToPrimitive,
    {
        let name = name.into();
        let target_loc = target_loc.into_array()?;
        let found = target_loc.shape();
        if target_loc.rank() != 2 {
            return Err(CostError::LocationShape {
                role: LocationRole::Target,
                found,
            });
        }
        let target_loc = location_matrix(target_loc.cast::<T>()?, LocationRole::Target)?;

        let target_scale = target_scale.into_array()?;
        let found = target_scale.shape();
        let target_scale = target_scale
            .into_scalar()
            .ok_or(CostError::ScaleShape { found })?;
        let requested = target_scale.to_f64().unwrap_or(f64::NAN);
        if !requested.is_finite() || requested <= 0.0 {
            return Err(CostError::InvalidScale { value: requested });
        }
        let target_scale: T = cast_value(&target_scale)?;
        if target_scale <= T::zero() {
            // underflowed at this precision
            return Err(CostError::InvalidScale { value: requested });
        }

        debug!(
            name = %name,
            dim = target_loc.ncols(),
            dtype = %T::DTYPE,
            scale = %target_scale,
            "squared-exponential cost created"
        );

        Ok(Self {
            name,
            target_loc,
            target_scale,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn target_loc(&self) -> &DMatrix<T> {
        &self.target_loc
    }

    pub fn target_scale(&self) -> T {
        self.target_scale
    }

    /// Target dimensionality `D`.
    pub fn dimension(&self) -> usize {
        self.target_loc.ncols()
    }

    /// Expected cost under `N(loc, cov)`, casting both inputs to `T` first.
    pub fn expected_cost<L, C, S>(&self, loc: L, cov: C) -> CostResult<T>
    where
        L: IntoArray<S>,
        C: IntoArray<S>,
        S: Scalar + ToPrimitive,
    {
        let loc = location_matrix(loc.into_array()?.cast::<T>()?, LocationRole::Query)?;
        let cov = covariance_matrix(cov.into_array()?.cast::<T>()?, loc.ncols())?;
        self.compute(&loc, &cov)
    }

    /// Cost of a point-mass belief at `loc`.
    pub fn call<L, S>(&self, loc: L) -> CostResult<T>
    where
        L: IntoArray<S>,
        S: Scalar + ToPrimitive,
    {
        let loc = location_matrix(loc.into_array()?.cast::<T>()?, LocationRole::Query)?;
        let dim = loc.ncols();
        self.compute(&loc, &DMatrix::zeros(dim, dim))
    }

    fn compute(&self, loc: &DMatrix<T>, cov: &DMatrix<T>) -> CostResult<T> {
        let dim = location_dim(loc, LocationRole::Query)?;
        check_covariance(cov, dim)?;
        if dim != self.dimension() {
            return Err(CostError::DimensionMismatch {
                expected: self.dimension(),
                found: dim,
            });
        }
        if let Some(bad) = loc.iter().chain(cov.iter()).find(|v| !v.is_finite()) {
            return Err(CostError::Cast {
                dtype: T::DTYPE,
                value: format!("{:?}", bad),
            });
        }

        let identity = DMatrix::<T>::identity(dim, dim);
        let scale_sq = self.target_scale * self.target_scale;

        let cov_plus_target_scale = cov + &identity * scale_sq;
        let diffs = loc - &self.target_loc;

        let solved = cov_plus_target_scale
            .lu()
            .solve(&diffs.transpose())
            .filter(|y| y.iter().all(|v| v.is_finite()))
            .ok_or(CostError::SingularMatrix { dim })?;

        let half: T = nalgebra::convert(0.5);
        let quad = -half * diffs.transpose().dot(&solved);
        let exp_quad = quad.exp();

        let det_coeff = (&identity + cov / scale_sq).determinant().sqrt();

        let cost = T::one() - exp_quad / det_coeff;
        if cost.is_finite() {
            trace!(name = %self.name, dim, cost = %cost, "expected cost evaluated");
        } else {
            warn!(
                name = %self.name,
                dim,
                det_coeff = %det_coeff,
                "expected cost is not finite; covariance may not be positive semidefinite"
            );
        }
        Ok(cost)
    }
}

impl<T: Precision> Cost<T> for SquaredExponentialCost<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn expected_cost(&self, loc: &DMatrix<T>, cov: &DMatrix<T>) -> CostResult<T> {
        self.compute(loc, cov)
    }
}
