//! Typed cost configuration.
//!
//! A cost file names its precision and describes one cost variant, tagged by
//! `kind`:
//!
//! ```toml
//! schema_version = "1.0.0"
//! name = "cartpole_upright"
//! dtype = "float64"
//! kind = "squared_exponential"
//! target_loc = [[0.0, 0.0, 3.14159, 0.0]]
//! target_scale = 0.25
//! ```
//!
//! JSON files use the same field names.

use std::path::Path;

use pilco_cost::{AnyCost, Dtype, NdArray};
use serde::{Deserialize, Serialize};

use crate::validate::{build_checked, ValidationError, ValidationResult};
use crate::ConfigError;

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> ValidationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ValidationError::UnsupportedFormat(format!(
                "{} (expected .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// A cost configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Schema version for compatibility checking.
    pub schema_version: String,

    /// Optional instance name reported with results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Working precision.
    #[serde(default)]
    pub dtype: Dtype,

    /// The cost variant and its parameters.
    #[serde(flatten)]
    pub cost: CostSpec,
}

/// Cost variants, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostSpec {
    /// Expected squared-exponential cost around a target.
    SquaredExponential {
        /// `1 x D` target location.
        target_loc: NdArray<f64>,
        /// Width of the cost basin; one positive value.
        target_scale: NdArray<f64>,
    },
}

impl CostConfig {
    /// Load a config file, choosing the parser by extension.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, format)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> ValidationResult<Self> {
        match format {
            ConfigFormat::Json => Self::from_json_str(content),
            ConfigFormat::Toml => Self::from_toml_str(content),
        }
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse a config from a TOML string.
    pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Target dimensionality, if the target is a well-formed row.
    pub fn dimension(&self) -> Option<usize> {
        match &self.cost {
            CostSpec::SquaredExponential { target_loc, .. } => match target_loc.shape().dims() {
                [1, d] => Some(*d),
                _ => None,
            },
        }
    }

    /// Short tag of the configured variant.
    pub fn kind(&self) -> &'static str {
        match self.cost {
            CostSpec::SquaredExponential { .. } => "squared_exponential",
        }
    }

    /// Validate and build the evaluator.
    pub fn build(&self) -> Result<AnyCost, ConfigError> {
        Ok(build_checked(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_CONFIG: &str = r#"
schema_version = "1.0.0"
name = "pendulum"
dtype = "float32"
kind = "squared_exponential"
target_loc = [[3.14159, 0.0]]
target_scale = 0.5
"#;

    const JSON_CONFIG: &str = r#"{
        "schema_version": "1.0.0",
        "kind": "squared_exponential",
        "target_loc": [[0.0, 0.0, 0.0]],
        "target_scale": [[1.0]]
    }"#;

    #[test]
    fn parses_toml() {
        let cfg = CostConfig::from_toml_str(TOML_CONFIG).unwrap();
        assert_eq!(cfg.dtype, Dtype::Float32);
        assert_eq!(cfg.name.as_deref(), Some("pendulum"));
        assert_eq!(cfg.dimension(), Some(2));
        assert_eq!(cfg.kind(), "squared_exponential");
    }

    #[test]
    fn parses_json_with_defaults() {
        let cfg = CostConfig::from_json_str(JSON_CONFIG).unwrap();
        assert_eq!(cfg.dtype, Dtype::Float64);
        assert!(cfg.name.is_none());
        assert_eq!(cfg.dimension(), Some(3));
    }

    #[test]
    fn builds_evaluator() {
        let cost = CostConfig::from_toml_str(TOML_CONFIG).unwrap().build().unwrap();
        assert_eq!(cost.dtype(), Dtype::Float32);
        assert_eq!(cost.name(), "pendulum");
        assert_eq!(cost.dimension(), 2);
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let json = r#"{"schema_version": "1.0.0", "kind": "saturating", "target_loc": [[0.0]], "target_scale": 1.0}"#;
        let err = CostConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.code(), 61);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("cost.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("/etc/pilco/cost.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("cost.yaml")).is_err());
    }

    #[test]
    fn serializes_back_to_json() {
        let cfg = CostConfig::from_json_str(JSON_CONFIG).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = CostConfig::from_json_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
