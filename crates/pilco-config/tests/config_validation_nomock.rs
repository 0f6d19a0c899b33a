//! No-mock configuration loading + resolution tests.
//!
//! Covers:
//! - JSON and TOML cost configs written to real files
//! - Validation error codes for malformed configs
//! - Resolution order (CLI > env path > config dir)
//! - Belief files evaluated against a loaded cost

use pilco_config::resolve::{resolve_cost_config, ConfigSource, ENV_CONFIG_DIR, ENV_COST_CONFIG};
use pilco_config::{content_hash, load_beliefs, load_cost, ConfigError, CostConfig, ValidationError};
use pilco_cost::Dtype;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TOML_COST: &str = r#"
schema_version = "1.0.0"
name = "cartpole_upright"
dtype = "float32"
kind = "squared_exponential"
target_loc = [[0.0, 0.0, 3.14159, 0.0]]
target_scale = 0.25
"#;

const JSON_COST: &str = r#"{
    "schema_version": "1.0.0",
    "dtype": "f64",
    "kind": "squared_exponential",
    "target_loc": [[0.0, 0.0]],
    "target_scale": [[1.0]]
}"#;

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let saved = keys.iter().map(|key| env::var(key).ok()).collect();
        for key in keys {
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, saved) in self.keys.iter().zip(&self.saved) {
            match saved {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    f()
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn loads_toml_config_from_cli_path() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "cost.toml", TOML_COST);

    let loaded = load_cost(Some(&path)).expect("load toml config");
    assert_eq!(loaded.source, ConfigSource::CliArgument);
    assert_eq!(loaded.cost.dtype(), Dtype::Float32);
    assert_eq!(loaded.cost.dimension(), 4);
    assert_eq!(loaded.cost.name(), "cartpole_upright");
    assert_eq!(loaded.content_hash, content_hash(TOML_COST));
}

#[test]
fn loads_json_config_with_dtype_alias() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "cost.json", JSON_COST);

    let loaded = load_cost(Some(&path)).expect("load json config");
    assert_eq!(loaded.cost.dtype(), Dtype::Float64);
    assert_eq!(loaded.cost.dimension(), 2);
    assert_eq!(loaded.cost.name(), "eq_cost");
}

#[test]
fn missing_cli_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_cost(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{:?}", err);
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "cost.yaml", "kind: squared_exponential");
    let err = load_cost(Some(&path)).unwrap_err();
    match err {
        ConfigError::Validation(v) => assert_eq!(v.code(), 67),
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn malformed_configs_report_stable_codes() {
    let cases: [(&str, u32); 4] = [
        ("{ not json", 61),
        (
            r#"{"schema_version": "2.0.0", "kind": "squared_exponential", "target_loc": [[0.0]], "target_scale": 1.0}"#,
            66,
        ),
        (
            r#"{"schema_version": "1.0.0", "kind": "squared_exponential", "target_loc": [[0.0], [1.0]], "target_scale": 1.0}"#,
            65,
        ),
        (
            r#"{"schema_version": "1.0.0", "kind": "squared_exponential", "target_loc": [[0.0]], "target_scale": -0.5}"#,
            65,
        ),
    ];

    for (json, code) in cases {
        let err = CostConfig::from_json_str(json)
            .and_then(|cfg| pilco_config::validate_cost_config(&cfg).map(|_| cfg));
        let err: ValidationError = err.expect_err(json);
        assert_eq!(err.code(), code, "{}", json);
    }
}

#[test]
fn ragged_target_surfaces_cost_error() {
    let json = r#"{"schema_version": "1.0.0", "kind": "squared_exponential", "target_loc": [[0.0, 1.0], [2.0]], "target_scale": 1.0}"#;
    let err = CostConfig::from_json_str(json).unwrap_err();
    assert_eq!(err.code(), 61);
    assert!(err.to_string().contains("row"), "{}", err);
}

#[test]
fn build_reports_constructor_errors_against_config_fields() {
    let cfg = CostConfig::from_toml_str(TOML_COST).unwrap();
    assert!(cfg.build().is_ok());

    let json = r#"{"schema_version": "1.0.0", "dtype": "float32", "kind": "squared_exponential", "target_loc": [[1e300, 0.0]], "target_scale": 1.0}"#;
    let err = CostConfig::from_json_str(json).unwrap().build().unwrap_err();
    match err {
        ConfigError::Validation(v) => {
            assert_eq!(v.code(), 65);
            assert!(v.to_string().contains("target_loc"), "{}", v);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn env_path_used_when_no_cli_path() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_COST_CONFIG, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "mine.json", JSON_COST);
        env::set_var(ENV_COST_CONFIG, &path);

        let resolved = resolve_cost_config(None).expect("resolved from env");
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path, path);
    });
}

#[test]
fn cli_path_beats_env_path() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_COST_CONFIG, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let env_path = write_file(dir.path(), "env.json", JSON_COST);
        let cli_path = write_file(dir.path(), "cli.toml", TOML_COST);
        env::set_var(ENV_COST_CONFIG, &env_path);

        let loaded = load_cost(Some(&cli_path)).unwrap();
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.cost.dimension(), 4);
    });
}

#[test]
fn config_dir_prefers_toml() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_COST_CONFIG, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "cost.json", JSON_COST);
        let toml_path = write_file(dir.path(), "cost.toml", TOML_COST);
        env::set_var(ENV_CONFIG_DIR, dir.path());

        let resolved = resolve_cost_config(None).expect("resolved from config dir");
        assert_eq!(resolved.source, ConfigSource::ConfigDir);
        assert_eq!(resolved.path, toml_path);
    });
}

// ============================================================================
// Beliefs
// ============================================================================

#[test]
fn belief_file_evaluates_in_order() {
    let dir = TempDir::new().unwrap();
    let cost_path = write_file(dir.path(), "cost.json", JSON_COST);
    let belief_path = write_file(
        dir.path(),
        "beliefs.json",
        r#"[
            {"loc": [[0.0, 0.0]]},
            {"loc": [[0.5, 0.5]], "cov": [[0.1, 0.0], [0.0, 0.1]]},
            {"loc": [[2.0, 2.0]]}
        ]"#,
    );

    let loaded = load_cost(Some(&cost_path)).unwrap();
    let beliefs = load_beliefs(&belief_path).unwrap();
    let values: Vec<f64> = beliefs
        .iter()
        .map(|b| b.evaluate(&loaded.cost).unwrap())
        .collect();

    assert_eq!(values.len(), 3);
    assert!(values[0].abs() < 1e-12);
    assert!(values[0] < values[1] && values[1] < values[2]);
}

#[test]
fn belief_with_mismatched_covariance_is_a_shape_error() {
    let dir = TempDir::new().unwrap();
    let cost_path = write_file(dir.path(), "cost.json", JSON_COST);
    let belief_path = write_file(
        dir.path(),
        "belief.json",
        r#"{"loc": [[0.0, 0.0]], "cov": [[1.0]]}"#,
    );

    let loaded = load_cost(Some(&cost_path)).unwrap();
    let beliefs = load_beliefs(&belief_path).unwrap();
    let err = beliefs[0].evaluate(&loaded.cost).unwrap_err();
    assert!(err.is_shape_error());
}
