//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file (`arbor.toml` in the working directory, or an explicit path)
//! 3. Environment variables: `ARBOR_*`
//!
//! The resulting [`Config`] is passed explicitly to every constructor that
//! needs a path or a storage policy.
//!
//! # Example Config
//!
//! ```toml
//! data_dir = "./data/arbor"
//! results_dir = "./results"
//! log_filter = "info,arbor_graph=debug"
//! default_size = 512
//! use_cache = true
//! force_override = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "arbor.toml";

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION STRUCTURES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Root directory holding one sub-directory per case (`P01`, `G03`, ...).
    pub data_dir: PathBuf,
    /// Directory receiving CSV exports.
    pub results_dir: PathBuf,
    /// `tracing-subscriber` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Volume size suffix appended to data file stems (`dag_512.arbor`).
    pub default_size: Option<u32>,
    /// Keep loaded graphs in the per-reader cache.
    pub use_cache: bool,
    /// Allow saving over existing data files.
    pub force_override: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/arbor"),
            results_dir: PathBuf::from("./results"),
            log_filter: "info".to_string(),
            default_size: None,
            use_cache: true,
            force_override: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Suffix appended to data file stems, empty when no size is configured.
    #[must_use]
    pub fn size_suffix(&self) -> String {
        match self.default_size {
            None | Some(0) => String::new(),
            Some(size) => format!("_{size}"),
        }
    }

    /// Apply `ARBOR_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a variable holds an unparsable value.
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ARBOR_*` overrides from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a variable holds an unparsable value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ARBOR_DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("ARBOR_RESULTS_DIR") {
            self.results_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("ARBOR_LOG_FILTER") {
            self.log_filter = value;
        }

        if let Some(value) = lookup("ARBOR_DEFAULT_SIZE") {
            self.default_size = Some(
                value
                    .parse()
                    .map_err(|e| Error::invalid_config("ARBOR_DEFAULT_SIZE", format!("{e}")))?,
            );
        }

        if let Some(value) = lookup("ARBOR_USE_CACHE") {
            self.use_cache = value
                .parse()
                .map_err(|e| Error::invalid_config("ARBOR_USE_CACHE", format!("{e}")))?;
        }

        if let Some(value) = lookup("ARBOR_FORCE_OVERRIDE") {
            self.force_override = value
                .parse()
                .map_err(|e| Error::invalid_config("ARBOR_FORCE_OVERRIDE", format!("{e}")))?;
        }

        Ok(())
    }

    /// Reject values no component can work with.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for an empty log filter or empty directories.
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::invalid_config("data_dir", "must not be empty"));
        }
        if self.results_dir.as_os_str().is_empty() {
            return Err(Error::invalid_config("results_dir", "must not be empty"));
        }
        if self.log_filter.trim().is_empty() {
            return Err(Error::invalid_config("log_filter", "must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from all sources with hierarchy.
///
/// With `path == None` the file `arbor.toml` in the working directory is used
/// if it exists; an explicit path must exist.
///
/// # Errors
///
/// Returns error if:
/// - An explicit config file is missing or unreadable
/// - Config file is malformed TOML
/// - An environment override cannot be parsed
/// - Config values fail validation
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(explicit) => load_toml_file(explicit)?,
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.exists() {
                load_toml_file(implicit)?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env_vars()?;
    config.validate()?;

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Load a TOML file; keys it does not set keep their defaults.
///
/// # Errors
///
/// Returns error if the file cannot be read or the TOML is malformed.
fn load_toml_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::file_read_failed(path, e.to_string()))?;

    toml::from_str(&content)
        .map_err(|e| Error::toml_parse_failed(format!("{}: {e}", path.display())))
}
