//! Command implementations, kept separate from argument parsing so they can
//! be driven directly in tests.

use std::io::Read;
use std::path::Path;

use pilco_config::{parse_beliefs, Belief, LoadedCost};
use pilco_cost::NdArray;
use tracing::{debug, info, info_span};

use crate::error::CliError;
use crate::output::{CheckReport, CostSummary, EvalReport, Evaluation};

/// Read beliefs from a JSON file, or from stdin when `path` is `-`.
pub fn read_beliefs(path: &Path) -> Result<Vec<Belief>, CliError> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        return parse_beliefs(&content).map_err(CliError::Belief);
    }
    pilco_config::load_beliefs(path).map_err(CliError::Belief)
}

/// Evaluate every belief in order, stopping at the first failure.
pub fn run_eval(loaded: &LoadedCost, beliefs: &[Belief]) -> Result<EvalReport, CliError> {
    let _span = info_span!("eval", cost = %loaded.cost.name(), beliefs = beliefs.len()).entered();

    let mut results = Vec::with_capacity(beliefs.len());
    for (index, belief) in beliefs.iter().enumerate() {
        let cost = belief
            .evaluate(&loaded.cost)
            .map_err(|source| CliError::Evaluation { index, source })?;
        let cost = finite(index, cost)?;
        debug!(index, cost, point_mass = belief.is_point_mass(), "Evaluated belief");
        results.push(Evaluation {
            index,
            cost,
            point_mass: belief.is_point_mass(),
        });
    }

    info!(count = results.len(), "Evaluation complete");
    Ok(EvalReport::new(CostSummary::from(loaded), results))
}

/// Evaluate the point-mass cost at a single location.
pub fn run_point(loaded: &LoadedCost, loc: &[f64]) -> Result<EvalReport, CliError> {
    let _span = info_span!("point", cost = %loaded.cost.name()).entered();

    let loc = NdArray::from_rows(&[loc.to_vec()])?;
    let cost = finite(0, loaded.cost.call(&loc)?)?;
    debug!(cost, "Evaluated point mass");

    Ok(EvalReport::new(
        CostSummary::from(loaded),
        vec![Evaluation {
            index: 0,
            cost,
            point_mass: true,
        }],
    ))
}

/// NaN or infinite costs have no JSON representation and are reported as
/// numeric failures.
fn finite(index: usize, cost: f64) -> Result<f64, CliError> {
    if cost.is_finite() {
        Ok(cost)
    } else {
        Err(CliError::NonFiniteCost { index, value: cost })
    }
}

/// Summarize an already validated cost config.
pub fn run_check(loaded: &LoadedCost) -> CheckReport {
    CheckReport::ok(CostSummary::from(loaded))
}
