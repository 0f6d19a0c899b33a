//! Gaussian belief files.
//!
//! A belief file is JSON holding either one belief or an array of them:
//!
//! ```json
//! [
//!   { "loc": [[0.1, 0.2]], "cov": [[0.01, 0.0], [0.0, 0.02]] },
//!   { "loc": [[0.0, 0.0]] }
//! ]
//! ```
//!
//! A belief without `cov` is a point mass and goes through the zero-covariance
//! path.

use std::path::Path;

use pilco_cost::{AnyCost, CostResult, NdArray};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::{ValidationError, ValidationResult};

/// A Gaussian belief over the system state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    /// Mean of the belief, `1 x D`.
    pub loc: NdArray<f64>,

    /// Covariance, `D x D`. Absent for a point mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cov: Option<NdArray<f64>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BeliefDocument {
    Many(Vec<Belief>),
    One(Belief),
}

impl Belief {
    /// A point-mass belief at `loc`.
    pub fn point(loc: NdArray<f64>) -> Self {
        Self { loc, cov: None }
    }

    pub fn is_point_mass(&self) -> bool {
        self.cov.is_none()
    }

    /// Evaluate `cost` under this belief.
    pub fn evaluate(&self, cost: &AnyCost) -> CostResult<f64> {
        match &self.cov {
            Some(cov) => cost.expected_cost(&self.loc, cov),
            None => cost.call(&self.loc),
        }
    }
}

/// Parse one belief or an array of beliefs from JSON.
pub fn parse_beliefs(json: &str) -> ValidationResult<Vec<Belief>> {
    let doc: BeliefDocument = serde_json::from_str(json).map_err(|e| {
        ValidationError::ParseError(format!("Invalid belief JSON: {}", e))
    })?;
    Ok(match doc {
        BeliefDocument::Many(beliefs) => beliefs,
        BeliefDocument::One(belief) => vec![belief],
    })
}

/// Load beliefs from a JSON file.
pub fn load_beliefs(path: &Path) -> ValidationResult<Vec<Belief>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let beliefs = parse_beliefs(&content)?;
    debug!(path = %path.display(), count = beliefs.len(), "Loaded beliefs");
    Ok(beliefs)
}
