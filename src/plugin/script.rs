// ABOUTME: Deployment plugin backed by a directory of executable phase scripts.
// ABOUTME: A phase is implemented when an executable named after it exists.

use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{DeploymentPlugin, Phase, PluginConfig, PluginError};
use crate::context::ReleaseContext;
use crate::exec::{CommandLine, CommandRunner, SystemCommandRunner};

/// A phase script that was found at resolution time but is gone when called.
#[derive(Debug, thiserror::Error)]
#[error("phase script {} is missing or not executable", .0.display())]
pub struct MissingScript(pub PathBuf);

/// Plugin installed as `<plugin_dir>/<name>/<phase>` executables.
///
/// Each script runs in the release's working directory and receives the
/// plugin configuration and release metadata through `RELEASE_RECOVERY_*`
/// environment variables. The set of implemented phases is fixed when the
/// plugin is discovered.
#[derive(Clone)]
pub struct ScriptPlugin {
    name: String,
    dir: PathBuf,
    phases: HashSet<Phase>,
    runner: Arc<dyn CommandRunner>,
}

impl ScriptPlugin {
    /// A plugin with no phases. See [`ScriptPlugin::discover`].
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            phases: HashSet::new(),
            runner: Arc::new(SystemCommandRunner),
        }
    }

    /// Build the plugin in `dir`, recording which phase scripts are executable.
    pub async fn discover(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let mut plugin = Self::new(name, dir);
        for phase in Phase::ALL {
            if is_executable(&plugin.script_path(phase)).await {
                plugin.phases.insert(phase);
            }
        }
        plugin
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the path to a phase script.
    pub fn script_path(&self, phase: Phase) -> PathBuf {
        self.dir.join(phase.filename())
    }

    /// Phases this plugin ships a script for, in lifecycle order.
    pub fn phases(&self) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|p| self.phases.contains(p))
            .collect()
    }

    fn script_env(
        &self,
        phase: Phase,
        config: &PluginConfig,
        context: &ReleaseContext,
    ) -> Result<HashMap<String, String>, PluginError> {
        let config = serde_json::to_string(config).map_err(PluginError::new)?;

        let mut env = HashMap::new();
        env.insert("RELEASE_RECOVERY_PLUGIN".to_string(), self.name.clone());
        env.insert("RELEASE_RECOVERY_PHASE".to_string(), phase.to_string());
        env.insert("RELEASE_RECOVERY_PLUGIN_CONFIG".to_string(), config);
        env.insert(
            "RELEASE_RECOVERY_DRY_RUN".to_string(),
            context.is_dry_run().to_string(),
        );
        if let Some(release) = &context.next_release {
            env.insert(
                "RELEASE_RECOVERY_VERSION".to_string(),
                release.version.clone(),
            );
            env.insert(
                "RELEASE_RECOVERY_GIT_TAG".to_string(),
                release.git_tag.clone(),
            );
            if let Some(channel) = &release.channel {
                env.insert("RELEASE_RECOVERY_CHANNEL".to_string(), channel.clone());
            }
        }
        Ok(env)
    }
}

#[async_trait]
impl DeploymentPlugin for ScriptPlugin {
    fn implements(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    async fn call(
        &self,
        phase: Phase,
        config: &PluginConfig,
        context: &ReleaseContext,
    ) -> Result<(), PluginError> {
        if !self.implements(phase) {
            return Ok(());
        }
        let script = self.script_path(phase);
        if !is_executable(&script).await {
            return Err(PluginError::new(MissingScript(script)));
        }

        tracing::debug!(plugin = %self.name, %phase, script = %script.display(), "running phase script");

        let command = CommandLine::new(script.to_string_lossy())
            .envs(context.env.clone())
            .envs(self.script_env(phase, config, context)?)
            .current_dir(context.cwd.clone());

        self.runner
            .run(&command, &context.logger)
            .await
            .map_err(PluginError::new)
    }
}

async fn is_executable(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && has_exec_bit(&meta),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_exec_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_meta: &Metadata) -> bool {
    true
}
