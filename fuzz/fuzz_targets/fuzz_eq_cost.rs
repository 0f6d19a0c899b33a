//! Fuzz target for expected-cost evaluation.
//!
//! Arbitrary target, scale and belief shapes at either precision. Every
//! combination must return a value or an error without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pilco_cost::{AnyCost, Dtype, NdArray};

#[derive(Debug, Arbitrary)]
struct Input {
    single: bool,
    target: Vec<Vec<f64>>,
    scale: f64,
    loc: Vec<Vec<f64>>,
    cov: Option<Vec<Vec<f64>>>,
}

fn array(rows: &[Vec<f64>]) -> Option<NdArray<f64>> {
    // Bound the work per input
    if rows.len() > 8 || rows.iter().any(|r| r.len() > 8) {
        return None;
    }
    NdArray::from_rows(rows).ok()
}

fuzz_target!(|input: Input| {
    let dtype = if input.single { Dtype::Float32 } else { Dtype::Float64 };
    let Some(target) = array(&input.target) else { return };
    let Ok(cost) =
        AnyCost::squared_exponential(dtype, &target, &NdArray::Scalar(input.scale), None)
    else {
        return;
    };
    let Some(loc) = array(&input.loc) else { return };

    let _ = match input.cov.as_deref().map(array) {
        Some(Some(cov)) => cost.expected_cost(&loc, &cov),
        Some(None) => return,
        None => cost.call(&loc),
    };
});
