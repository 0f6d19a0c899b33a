//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths.
//! There is no built-in default cost; a target must always be configured.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Named directly by `PILCO_COST_CONFIG`.
    Environment,

    /// Found under `PILCO_CONFIG_DIR`.
    ConfigDir,

    /// Found in the XDG config directory.
    XdgConfig,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigDir => write!(f, "config directory"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
        }
    }
}

/// A discovered config file and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_COST_CONFIG: &str = "PILCO_COST_CONFIG";
pub const ENV_CONFIG_DIR: &str = "PILCO_CONFIG_DIR";

/// Standard config file names, in preference order.
const COST_FILENAMES: [&str; 2] = ["cost.toml", "cost.json"];

/// Application name for XDG directories.
const APP_NAME: &str = "pilco";

/// Resolve the cost config path.
///
/// Resolution order:
/// 1. Explicit CLI path (returned even if missing, so the load reports it)
/// 2. `PILCO_COST_CONFIG` (direct path)
/// 3. `PILCO_CONFIG_DIR` + `cost.toml` / `cost.json`
/// 4. XDG config directory (`~/.config/pilco/`)
pub fn resolve_cost_config(cli_path: Option<&Path>) -> Option<ResolvedPath> {
    let resolved = resolve_inner(cli_path);
    match &resolved {
        Some(r) => debug!(path = %r.path.display(), source = %r.source, "Resolved cost config"),
        None => debug!("No cost config found"),
    }
    resolved
}

fn resolve_inner(cli_path: Option<&Path>) -> Option<ResolvedPath> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return Some(ResolvedPath {
            path: path.to_path_buf(),
            source: ConfigSource::CliArgument,
        });
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_COST_CONFIG) {
        if !env_path.is_empty() {
            return Some(ResolvedPath {
                path: PathBuf::from(env_path),
                source: ConfigSource::Environment,
            });
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = first_existing(Path::new(&config_dir)) {
            return Some(ResolvedPath {
                path,
                source: ConfigSource::ConfigDir,
            });
        }
    }

    // 4. XDG config directory
    if let Some(xdg_config) = dirs::config_dir() {
        if let Some(path) = first_existing(&xdg_config.join(APP_NAME)) {
            return Some(ResolvedPath {
                path,
                source: ConfigSource::XdgConfig,
            });
        }
    }

    None
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    COST_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}
