use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::{ChangeKind, DEFAULT_MARKER};
use crate::error::{ChartSyncError, Result};

/// Default configuration file name, looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "chartsync.toml";

/// Represents the complete configuration for chart-sync.
///
/// Contains the normalizer policy, file naming for the sync command, and
/// extra changelog section mappings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    /// Extra changelog heading -> change kind entries, merged over the built-in table
    #[serde(default)]
    pub sections: HashMap<String, ChangeKind>,
}

/// What to do with the marker letter on `appVersion`.
///
/// `add` matches container image tags such as `v1.0.1`; `strip` keeps
/// `appVersion` symmetric with the chart `version`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AppVersionPolicy {
    Strip,
    #[default]
    Add,
    Keep,
}

fn default_marker() -> char {
    DEFAULT_MARKER
}

/// Configuration for the chart version normalizer.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NormalizeConfig {
    #[serde(default = "default_marker")]
    pub marker: char,

    #[serde(default)]
    pub app_version: AppVersionPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            marker: default_marker(),
            app_version: AppVersionPolicy::default(),
        }
    }
}

fn default_metadata_file() -> String {
    "artifacthub-pkg.yml".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_root_markers() -> Vec<String> {
    vec![".github".to_string()]
}

fn default_version_env() -> String {
    "NEXT_RELEASE_VERSION".to_string()
}

/// Configuration for the changelog-to-metadata synchronizer.
///
/// File names are resolved relative to the chart directory; `root_markers`
/// name the entries that identify the repository root when falling back to a
/// top-level changelog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    #[serde(default = "default_root_markers")]
    pub root_markers: Vec<String>,

    #[serde(default = "default_version_env")]
    pub version_env: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            metadata_file: default_metadata_file(),
            changelog_file: default_changelog_file(),
            root_markers: default_root_markers(),
            version_env: default_version_env(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ChartSyncError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.normalize.marker.is_ascii_digit() || self.normalize.marker.is_whitespace() {
            return Err(ChartSyncError::config(format!(
                "marker must be a non-digit, non-space character, got '{}'",
                self.normalize.marker
            )));
        }
        if self.sync.metadata_file.is_empty() || self.sync.changelog_file.is_empty() {
            return Err(ChartSyncError::config("file names must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `chartsync.toml` in current directory
/// 3. `.chartsync.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or an explicit path is missing
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        if !path.exists() {
            return Err(ChartSyncError::not_found("Config file", path));
        }
        log::debug!("Loading config from {}", path.display());
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        log::debug!("Loading config from ./{}", CONFIG_FILE_NAME);
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            log::debug!("Loading config from {}", config_path.display());
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml_str(&config_str)
}
