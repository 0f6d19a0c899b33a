//! CLI errors and their exit codes.

use std::path::PathBuf;

use pilco_config::{ConfigError, ValidationError};
use pilco_cost::{CostError, CostErrorKind};
use thiserror::Error;

use crate::exit_codes::ExitCode;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid belief input: {0}")]
    Belief(ValidationError),

    #[error("Belief {index}: {source}")]
    Evaluation {
        index: usize,
        #[source]
        source: CostError,
    },

    #[error("Belief {index}: expected cost is {value}; covariance may not be positive semidefinite")]
    NonFiniteCost { index: usize, value: f64 },

    #[error(transparent)]
    Cost(#[from] CostError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Stable exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(e) => match e {
                ConfigError::Io { .. } => ExitCode::IoError,
                ConfigError::Validation(ValidationError::IoError(_)) => ExitCode::IoError,
                ConfigError::NotFound | ConfigError::Validation(_) => ExitCode::ConfigError,
            },
            CliError::Belief(ValidationError::IoError(_)) => ExitCode::IoError,
            CliError::Belief(_) => ExitCode::InputError,
            CliError::Evaluation { source, .. } | CliError::Cost(source) => cost_exit_code(source),
            CliError::NonFiniteCost { .. } => ExitCode::NumericError,
            CliError::Io { .. } => ExitCode::IoError,
            CliError::Output(_) => ExitCode::InternalError,
        }
    }
}

fn cost_exit_code(err: &CostError) -> ExitCode {
    match err.kind() {
        CostErrorKind::Shape | CostErrorKind::Input => ExitCode::InputError,
        CostErrorKind::Singular => ExitCode::NumericError,
    }
}
