//! Result payloads and their rendering.
//!
//! Results go to stdout as pretty JSON (default) or plain text. Errors are
//! rendered separately for stderr.

use clap::ValueEnum;
use pilco_config::LoadedCost;
use pilco_cost::Dtype;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Schema version of the JSON payloads.
pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default)
    #[default]
    Json,

    /// Plain text, one value per line
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Payloads that render as JSON or text.
pub trait Report: Serialize {
    fn render_text(&self) -> String;

    fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }
}

/// The configured cost as reported alongside results.
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    pub name: String,
    pub kind: String,
    pub dtype: Dtype,
    pub dimension: usize,
    pub config_path: String,
    pub config_source: String,
    pub content_hash: String,
}

impl From<&LoadedCost> for CostSummary {
    fn from(loaded: &LoadedCost) -> Self {
        CostSummary {
            name: loaded.cost.name().to_string(),
            kind: loaded.config.kind().to_string(),
            dtype: loaded.cost.dtype(),
            dimension: loaded.cost.dimension(),
            config_path: loaded.path.display().to_string(),
            config_source: loaded.source.to_string(),
            content_hash: loaded.content_hash.clone(),
        }
    }
}

/// One evaluated belief.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub index: usize,
    pub cost: f64,
    pub point_mass: bool,
}

/// Output of `eval` and `point`.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub schema_version: &'static str,
    pub generated_at: String,
    pub cost: CostSummary,
    pub results: Vec<Evaluation>,
}

impl EvalReport {
    pub fn new(cost: CostSummary, results: Vec<Evaluation>) -> Self {
        EvalReport {
            schema_version: OUTPUT_SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            cost,
            results,
        }
    }
}

impl Report for EvalReport {
    fn render_text(&self) -> String {
        self.results
            .iter()
            .map(|r| r.cost.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Output of `check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_version: &'static str,
    pub generated_at: String,
    pub status: &'static str,
    pub cost: CostSummary,
}

impl CheckReport {
    pub fn ok(cost: CostSummary) -> Self {
        CheckReport {
            schema_version: OUTPUT_SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            status: "ok",
            cost,
        }
    }
}

impl Report for CheckReport {
    fn render_text(&self) -> String {
        let c = &self.cost;
        format!(
            "Cost config OK\nName: {}\nKind: {}\nDtype: {}\nDimension: {}\nPath: {} ({})\nSHA-256: {}",
            c.name, c.kind, c.dtype, c.dimension, c.config_path, c.config_source, c.content_hash
        )
    }
}

/// Output of `version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub name: &'static str,
    pub version: &'static str,
    pub schema_version: &'static str,
    pub config_schema_version: &'static str,
}

impl Default for VersionReport {
    fn default() -> Self {
        VersionReport {
            name: "pilco-cost",
            version: env!("CARGO_PKG_VERSION"),
            schema_version: OUTPUT_SCHEMA_VERSION,
            config_schema_version: pilco_config::CONFIG_SCHEMA_VERSION,
        }
    }
}

impl Report for VersionReport {
    fn render_text(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

/// Render an error for stderr.
pub fn render_error(err: &CliError, format: OutputFormat) -> String {
    let code = err.exit_code();
    match format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": {
                    "code": code.code_name(),
                    "exit_code": code.as_i32(),
                    "message": err.to_string(),
                }
            });
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| err.to_string())
        }
        OutputFormat::Text => format!("Error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilco_cost::CostError;

    fn summary() -> CostSummary {
        CostSummary {
            name: "eq_cost".to_string(),
            kind: "squared_exponential".to_string(),
            dtype: Dtype::Float64,
            dimension: 2,
            config_path: "/tmp/cost.toml".to_string(),
            config_source: "CLI argument".to_string(),
            content_hash: "00".repeat(32),
        }
    }

    #[test]
    fn eval_text_is_one_line_per_result() {
        let report = EvalReport::new(
            summary(),
            vec![
                Evaluation { index: 0, cost: 0.0, point_mass: true },
                Evaluation { index: 1, cost: 0.5, point_mass: false },
            ],
        );
        assert_eq!(report.render(OutputFormat::Text).unwrap(), "0\n0.5");
    }

    #[test]
    fn eval_json_has_results_and_cost() {
        let report = EvalReport::new(
            summary(),
            vec![Evaluation { index: 0, cost: 0.25, point_mass: true }],
        );
        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["schema_version"], OUTPUT_SCHEMA_VERSION);
        assert_eq!(json["cost"]["dtype"], "float64");
        assert_eq!(json["results"][0]["cost"], 0.25);
        assert_eq!(json["results"][0]["point_mass"], true);
    }

    #[test]
    fn check_text_names_the_cost() {
        let text = CheckReport::ok(summary()).render_text();
        assert!(text.contains("Name: eq_cost"));
        assert!(text.contains("Dimension: 2"));
    }

    #[test]
    fn error_json_carries_exit_code() {
        let err = CliError::from(CostError::SingularMatrix { dim: 3 });
        let json: serde_json::Value =
            serde_json::from_str(&render_error(&err, OutputFormat::Json)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "ERR_NUMERIC");
        assert_eq!(json["error"]["exit_code"], 13);
    }
}
