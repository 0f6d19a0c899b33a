//! Error type shared by every cost variant.

use thiserror::Error;

use crate::dtype::Dtype;
use crate::input::Shape;

/// Result type alias for cost operations.
pub type CostResult<T> = Result<T, CostError>;

/// Which location a shape error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRole {
    /// The target location given at construction.
    Target,
    /// A query location given at evaluation.
    Query,
}

impl std::fmt::Display for LocationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationRole::Target => write!(f, "Target location"),
            LocationRole::Query => write!(f, "Location"),
        }
    }
}

/// Broad classification of a [`CostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostErrorKind {
    /// Malformed target or query shape.
    Shape,
    /// Values that cannot be used at all (bad scale, unrepresentable value).
    Input,
    /// The linear solve failed.
    Singular,
}

/// Errors raised while constructing or evaluating a cost.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    #[error("{role} must be 1 x target_dimension! (Found shape {found})")]
    LocationShape { role: LocationRole, found: Shape },

    #[error("Incorrect dimensions for covariance! (Expected {expected}, found {found})")]
    CovarianceShape { expected: Shape, found: Shape },

    #[error("Location has dimension {found} but the target has dimension {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Target scale must hold exactly one value! (Found shape {found})")]
    ScaleShape { found: Shape },

    #[error("Ragged array: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Target scale must be positive and finite, got {value}")]
    InvalidScale { value: f64 },

    #[error("Value {value} is not representable as {dtype}")]
    Cast { dtype: Dtype, value: String },

    #[error("Covariance plus target scale ({dim} x {dim}) is singular")]
    SingularMatrix { dim: usize },
}

impl CostError {
    pub fn kind(&self) -> CostErrorKind {
        match self {
            CostError::LocationShape { .. }
            | CostError::CovarianceShape { .. }
            | CostError::DimensionMismatch { .. }
            | CostError::ScaleShape { .. }
            | CostError::RaggedRows { .. } => CostErrorKind::Shape,
            CostError::InvalidScale { .. } | CostError::Cast { .. } => CostErrorKind::Input,
            CostError::SingularMatrix { .. } => CostErrorKind::Singular,
        }
    }

    pub fn is_shape_error(&self) -> bool {
        self.kind() == CostErrorKind::Shape
    }
}
