// ABOUTME: Resolves plugins installed as directories of phase scripts.
// ABOUTME: Scoped names like "@x/npm" map to nested directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::PluginResolver;
use crate::exec::{CommandRunner, SystemCommandRunner};
use crate::plugin::{DeploymentPlugin, ScriptPlugin};

/// Default location of installed plugins, relative to the project.
pub const DEFAULT_PLUGIN_DIR: &str = ".release-recovery/plugins";

/// Finds plugins under a root directory.
#[derive(Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            runner: Arc::new(SystemCommandRunner),
        }
    }

    /// Runner handed to every resolved plugin.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a plugin called `name` would be installed in.
    ///
    /// Returns None for names that are empty or would leave the root.
    pub fn plugin_dir(&self, name: &str) -> Option<PathBuf> {
        let mut dir = self.root.clone();
        for part in name.split('/') {
            if part.is_empty() || part == "." || part == ".." || part.contains('\\') {
                return None;
            }
            dir.push(part);
        }
        Some(dir)
    }
}

#[async_trait]
impl PluginResolver for DirectoryResolver {
    async fn resolve(&self, name: &str) -> Option<Arc<dyn DeploymentPlugin>> {
        let dir = self.plugin_dir(name)?;

        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!(plugin = name, dir = %dir.display(), "resolved plugin");
                let plugin = ScriptPlugin::discover(name, dir)
                    .await
                    .with_runner(Arc::clone(&self.runner));
                Some(Arc::new(plugin))
            }
            _ => None,
        }
    }
}
