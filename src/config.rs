//! src/config.rs

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the default configuration file path (~/.config/pygih/config.toml).
pub fn default_config_path() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        // Windows: %APPDATA%\pygih
        dirs::data_dir()
    } else {
        // Linux/macOS: ~/.config/pygih
        dirs::config_dir()
    };
    base.map(|p| p.join("pygih").join("config.toml"))
}

/// Defaults read from the configuration file. Every key is optional.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Linter command line run by the hook (e.g. "pylint --rcfile=.pylintrc").
    pub linter: Option<String>,
    /// Hook to install into.
    pub hook: Option<String>,
    pub strict: bool,
    pub backup: bool,
    pub append: bool,
    /// Paths excluded from linting.
    pub ignore: Vec<String>,
}

/// Load the configuration.
///
/// An explicitly given file must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (config_path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(Config::default()),
        },
    };

    if !config_path.exists() {
        if required {
            anyhow::bail!("Config file {} does not exist", config_path.display());
        }
        debug!("No config file at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Could not read config file {}", config_path.display()))?;
    let config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Could not parse config file {}", config_path.display()))?;

    debug!("Loaded config from {}", config_path.display());
    Ok(config)
}
