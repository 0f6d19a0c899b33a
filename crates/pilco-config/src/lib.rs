//! Configuration loading for pilco-cost.
//!
//! This crate handles:
//! - Loading cost configurations from JSON or TOML files
//! - Loading Gaussian belief files
//! - Semantic validation with stable error codes
//! - Config path resolution (CLI → env → XDG)
//! - Content hashing for provenance

pub mod belief;
pub mod cost;
pub mod resolve;
pub mod validate;

pub use belief::{load_beliefs, parse_beliefs, Belief};
pub use cost::{ConfigFormat, CostConfig, CostSpec};
pub use resolve::{resolve_cost_config, ConfigSource, ResolvedPath};
pub use validate::{validate_cost_config, ValidationError, ValidationResult};

use std::path::{Path, PathBuf};

use pilco_cost::AnyCost;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

/// Current schema version for cost configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Errors from loading and building a configured cost.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No cost configuration found (pass --config or set PILCO_COST_CONFIG)")]
    NotFound,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A loaded, validated cost with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedCost {
    pub config: CostConfig,
    pub cost: AnyCost,
    pub path: PathBuf,
    pub source: ConfigSource,
    /// SHA-256 of the file content.
    pub content_hash: String,
}

/// Resolve, read, validate and build the configured cost.
pub fn load_cost(cli_path: Option<&Path>) -> Result<LoadedCost, ConfigError> {
    let resolved = resolve_cost_config(cli_path).ok_or(ConfigError::NotFound)?;
    load_cost_from(resolved)
}

/// Load a cost from an already resolved path.
pub fn load_cost_from(resolved: ResolvedPath) -> Result<LoadedCost, ConfigError> {
    let format = ConfigFormat::from_path(&resolved.path)?;
    let content = std::fs::read_to_string(&resolved.path).map_err(|source| ConfigError::Io {
        path: resolved.path.clone(),
        source,
    })?;
    let config = CostConfig::parse(&content, format)?;
    let cost = config.build()?;
    let hash = content_hash(&content);

    info!(
        path = %resolved.path.display(),
        source = %resolved.source,
        kind = config.kind(),
        dtype = %cost.dtype(),
        dimension = cost.dimension(),
        "Loaded cost config"
    );

    Ok(LoadedCost {
        config,
        cost,
        path: resolved.path,
        source: resolved.source,
        content_hash: hash,
    })
}

/// SHA-256 hex digest of config content.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
