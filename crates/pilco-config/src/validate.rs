//! Configuration validation errors and semantic validation.

use pilco_cost::{AnyCost, CostError, Dtype, NdArray};
use thiserror::Error;

use crate::cost::{CostConfig, CostSpec};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::UnsupportedFormat(_) => 67,
        }
    }
}

/// Validate a cost configuration semantically.
pub fn validate_cost_config(config: &CostConfig) -> ValidationResult<()> {
    build_checked(config).map(|_| ())
}

fn validate_header(config: &CostConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if let Some(name) = &config.name {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "Must not be empty when given".to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the header fields and build the evaluator.
///
/// Target and scale rules live in the cost constructor; its errors are
/// reported here against the config field they came from.
pub(crate) fn build_checked(config: &CostConfig) -> ValidationResult<AnyCost> {
    validate_header(config)?;
    match &config.cost {
        CostSpec::SquaredExponential {
            target_loc,
            target_scale,
        } => AnyCost::squared_exponential(
            config.dtype,
            target_loc,
            target_scale,
            config.name.as_deref(),
        )
        .map_err(|err| {
            let field = match &err {
                CostError::ScaleShape { .. } | CostError::InvalidScale { .. } => "target_scale",
                CostError::Cast { .. } if casts_cleanly(target_loc, config.dtype) => "target_scale",
                _ => "target_loc",
            };
            ValidationError::InvalidValue {
                field: field.to_string(),
                message: err.to_string(),
            }
        }),
    }
}

fn casts_cleanly(values: &NdArray<f64>, dtype: Dtype) -> bool {
    match dtype {
        Dtype::Float32 => values.clone().cast::<f32>().is_ok(),
        Dtype::Float64 => values.clone().cast::<f64>().is_ok(),
    }
}
