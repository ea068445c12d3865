// ABOUTME: Application-wide error types for release-recovery.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::git::TagRemovalError;
use crate::plugin::PluginError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("deployment plugin `{name}` is not installed")]
    PluginNotInstalled { name: String },

    /// A sub-plugin phase failed. Carries the plugin's own error untouched.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Deleting the release tag failed while recovering from a failed publish.
    /// The publish failure that triggered the cleanup is kept in `original`.
    #[error("failed to delete git tag {tag} after `{plugin}` failed to publish: {source}")]
    Compensation {
        tag: String,
        plugin: String,
        #[source]
        source: TagRemovalError,
        original: PluginError,
    },

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    SettingsNotFound(PathBuf),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Plugin list missing, empty or malformed.
    Config,
    /// A configured plugin could not be resolved.
    PluginNotInstalled,
    /// A sub-plugin phase operation failed.
    Plugin,
    /// The release tag could not be deleted after a failed publish.
    Compensation,
    /// Settings file could not be found, read or written.
    Settings,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::PluginNotInstalled { .. } => ErrorKind::PluginNotInstalled,
            Error::Plugin(_) => ErrorKind::Plugin,
            Error::Compensation { .. } => ErrorKind::Compensation,
            Error::AlreadyExists(_)
            | Error::SettingsNotFound(_)
            | Error::InvalidSettings(_)
            | Error::Io(_)
            | Error::Yaml(_) => ErrorKind::Settings,
        }
    }

    /// The sub-plugin error behind this failure, if a sub-plugin caused it.
    ///
    /// For compensation failures this is the publish error that triggered
    /// the tag deletion.
    pub fn plugin_error(&self) -> Option<&PluginError> {
        match self {
            Error::Plugin(err) => Some(err),
            Error::Compensation { original, .. } => Some(original),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
