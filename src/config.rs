//! Configuration file support for ferro-reconcile.
//!
//! A `.ferro-reconcile.toml` file can pin the default species and the fixture
//! data files the CLI loads its sources from, so repeated queries do not need
//! the full flag set.
//!
//! # Example Configuration
//!
//! ```toml
//! [defaults]
//! species = "hsapiens_grch37"
//!
//! [data]
//! species-list = "species.json"
//! accessioning = "accessions.json"
//! warehouse = "warehouse.json"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-reconcile.toml` in the current directory
//! 2. `~/.config/ferro-reconcile/config.toml`
//!
//! CLI flags take precedence over config file settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconcileError;

/// Parsed configuration from a `.ferro-reconcile.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReconcileConfig {
    /// Query defaults.
    pub defaults: DefaultsConfig,
    /// Data file locations.
    pub data: DataConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DefaultsConfig {
    /// Species key used when `--species` is not given.
    pub species: Option<String>,
}

/// `[data]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataConfig {
    /// Species reference table (JSON array).
    pub species_list: Option<PathBuf>,
    /// Accessioning source fixture file.
    pub accessioning: Option<PathBuf>,
    /// Warehouse source fixture file.
    pub warehouse: Option<PathBuf>,
}

impl ReconcileConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-reconcile.toml` in the current directory
    /// 2. `~/.config/ferro-reconcile/config.toml`
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro-reconcile.toml");
        if cwd_config.exists() {
            if let Ok(config) = Self::load_from_path(&cwd_config) {
                return Some(config);
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home
                .join(".config")
                .join("ferro-reconcile")
                .join("config.toml");
            if home_config.exists() {
                if let Ok(config) = Self::load_from_path(&home_config) {
                    return Some(config);
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, ReconcileError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the species to query: the CLI flag wins over the config file.
    pub fn resolve_species(&self, cli_species: Option<&str>) -> Option<String> {
        cli_species
            .map(str::to_string)
            .or_else(|| self.defaults.species.clone())
    }

    /// Resolve a data file path: the CLI flag wins over the config file.
    pub fn resolve_path<'a>(
        cli_path: Option<&'a Path>,
        config_path: Option<&'a Path>,
    ) -> Option<&'a Path> {
        cli_path.or(config_path)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
