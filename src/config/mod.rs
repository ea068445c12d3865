// ABOUTME: Deployment plugin configuration and settings file handling.
// ABOUTME: Parses the `plugins` list and discovers release-recovery.yml.

mod deserialize;
mod init;

pub use init::init_config;

use crate::error::{Error, Result};
use crate::plugin::PluginConfig;
use crate::resolver::DEFAULT_PLUGIN_DIR;
use deserialize::plugin_entry;
use nonempty::NonEmpty;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "release-recovery.yml";
pub const CONFIG_FILENAME_ALT: &str = "release-recovery.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".release-recovery/config.yml";

/// Problems with the `plugins` list.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration is in an incorrect format: no `plugins` list defined")]
    MissingPlugins,

    #[error("no deployment plugins found: `plugins` must name at least one plugin")]
    NoPlugins,

    #[error("configuration is in an incorrect format: {source}")]
    Malformed { source: serde_json::Error },

    #[error("plugin entry {index} is in an incorrect format: {source}")]
    MalformedEntry {
        index: usize,
        source: serde_json::Error,
    },

    #[error("plugin entry {index} has an empty name")]
    EmptyName { index: usize },
}

/// A configured deployment plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPluginSpec {
    pub name: String,
    pub config: PluginConfig,
}

impl DeploymentPluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: PluginConfig::new(),
        }
    }

    pub fn with_config(name: impl Into<String>, config: PluginConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Configured plugins, in the order their phases run.
pub type DeploymentPlugins = NonEmpty<DeploymentPluginSpec>;

/// Read the `plugins` list out of a raw configuration value.
///
/// Entries are either a bare name or a `[name, config]` pair.
pub fn parse_plugins(raw: &Value) -> std::result::Result<DeploymentPlugins, ConfigError> {
    let plugins = raw
        .get("plugins")
        .filter(|v| !v.is_null())
        .ok_or(ConfigError::MissingPlugins)?;

    let entries = Vec::<Value>::deserialize(plugins)
        .map_err(|source| ConfigError::Malformed { source })?;

    let specs = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let spec = plugin_entry(entry)
                .map_err(|source| ConfigError::MalformedEntry { index, source })?;
            if spec.name.trim().is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            Ok(spec)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    NonEmpty::from_vec(specs).ok_or(ConfigError::NoPlugins)
}

/// Contents of the settings file.
///
/// Only the keys the CLI host needs are typed; the whole document is kept in
/// `raw` and handed to the orchestrator as its plugin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: PathBuf,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(skip)]
    pub raw: Value,
}

fn default_plugin_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PLUGIN_DIR)
}

fn default_remote() -> String {
    crate::git::DEFAULT_REMOTE.to_string()
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mut settings: Settings = serde_yaml::from_value(document.clone())?;
        settings.raw =
            serde_json::to_value(&document).map_err(|e| Error::InvalidSettings(e.to_string()))?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::SettingsNotFound(dir.to_path_buf()))
    }

    /// Plugin directory, resolved against the project directory.
    pub fn plugin_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.plugin_dir)
    }
}
