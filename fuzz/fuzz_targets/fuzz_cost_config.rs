//! Fuzz target for cost configuration parsing.
//!
//! Feeds arbitrary bytes to both the JSON and TOML parsers. Anything that
//! parses is built, and anything that builds is evaluated on its own target.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pilco_config::CostConfig;
use pilco_cost::NdArray;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for parsed in [CostConfig::from_json_str(text), CostConfig::from_toml_str(text)] {
        let Ok(config) = parsed else { continue };
        let Ok(cost) = config.build() else { continue };
        let Some(dim) = config.dimension() else { continue };

        let loc = NdArray::from_rows(&[vec![0.0; dim]]).expect("single row is never ragged");
        let _ = cost.call(&loc);
    }
});
