//! Fuzz target for belief file parsing.
//!
//! Parsed beliefs are evaluated against a fixed two-dimensional cost; shape
//! mismatches must surface as errors, never panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pilco_config::parse_beliefs;
use pilco_cost::{AnyCost, Dtype, NdArray};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(beliefs) = parse_beliefs(text) else {
        return;
    };

    let target = NdArray::Matrix(pilco_cost::DMatrix::zeros(1, 2));
    let Ok(cost) = AnyCost::squared_exponential(Dtype::Float64, &target, &NdArray::Scalar(1.0), None)
    else {
        return;
    };
    for belief in &beliefs {
        let _ = belief.evaluate(&cost);
    }
});
