//! Cost functions over Gaussian state beliefs.
//!
//! [`Cost`] is the capability every cost variant provides: an expected cost
//! under a belief `(loc, cov)` and the point-mass evaluation `evaluate(loc)`.
//! New cost shapes are added as further implementors; callers only depend on
//! the trait.

pub mod any;
pub mod eq;
pub mod error;

use nalgebra::DMatrix;

use crate::dtype::{Dtype, Precision};
use crate::input::{NdArray, Shape};
use error::{CostError, CostResult, LocationRole};

/// A cost function evaluated at precision `T`.
pub trait Cost<T: Precision>: Send + Sync {
    /// Human-readable name of this cost instance.
    fn name(&self) -> &str;

    /// Working precision.
    fn dtype(&self) -> Dtype {
        T::DTYPE
    }

    /// Expected cost under the Gaussian belief `N(loc, cov)`.
    ///
    /// `loc` must be `1 x D` and `cov` must be `D x D`.
    fn expected_cost(&self, loc: &DMatrix<T>, cov: &DMatrix<T>) -> CostResult<T>;

    /// Cost of a point-mass belief at `loc` (zero covariance).
    fn evaluate(&self, loc: &DMatrix<T>) -> CostResult<T> {
        let dim = location_dim(loc, LocationRole::Query)?;
        self.expected_cost(loc, &DMatrix::zeros(dim, dim))
    }

    /// Point-mass costs of independent locations, in order.
    fn evaluate_batch(&self, locs: &[DMatrix<T>]) -> CostResult<Vec<T>> {
        locs.iter().map(|loc| self.evaluate(loc)).collect()
    }
}

/// Validated dimension `D` of a `1 x D` location.
pub(crate) fn location_dim<T: Precision>(loc: &DMatrix<T>, role: LocationRole) -> CostResult<usize> {
    if loc.nrows() != 1 || loc.ncols() == 0 {
        return Err(CostError::LocationShape {
            role,
            found: Shape::matrix(loc.nrows(), loc.ncols()),
        });
    }
    Ok(loc.ncols())
}

/// Unwrap a rank-2 `1 x D` location.
pub(crate) fn location_matrix<T: Precision>(
    loc: NdArray<T>,
    role: LocationRole,
) -> CostResult<DMatrix<T>> {
    let found = loc.shape();
    let matrix = loc
        .into_matrix()
        .ok_or(CostError::LocationShape { role, found })?;
    location_dim(&matrix, role)?;
    Ok(matrix)
}

/// Unwrap a rank-2 `dim x dim` covariance.
pub(crate) fn covariance_matrix<T: Precision>(cov: NdArray<T>, dim: usize) -> CostResult<DMatrix<T>> {
    let found = cov.shape();
    match cov.into_matrix() {
        Some(matrix) => {
            check_covariance(&matrix, dim)?;
            Ok(matrix)
        }
        None => Err(CostError::CovarianceShape {
            expected: Shape::matrix(dim, dim),
            found,
        }),
    }
}

pub(crate) fn check_covariance<T: Precision>(cov: &DMatrix<T>, dim: usize) -> CostResult<()> {
    if cov.nrows() != dim || cov.ncols() != dim {
        return Err(CostError::CovarianceShape {
            expected: Shape::matrix(dim, dim),
            found: Shape::matrix(cov.nrows(), cov.ncols()),
        });
    }
    Ok(())
}
