// ABOUTME: Run-scoped store of resolved deployment plugins.
// ABOUTME: Filled once by verify-conditions, read-only afterwards, cleared on reset.

use std::fmt;
use std::sync::Arc;

use crate::config::DeploymentPluginSpec;
use crate::context::ReleaseContext;
use crate::plugin::{DeploymentPlugin, Phase, PluginError};

/// A configured plugin paired with the module implementing it.
#[derive(Clone)]
pub struct ResolvedPlugin {
    pub spec: DeploymentPluginSpec,
    pub module: Arc<dyn DeploymentPlugin>,
}

impl ResolvedPlugin {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn implements(&self, phase: Phase) -> bool {
        self.module.implements(phase)
    }

    /// Run `phase` with this plugin's own configuration.
    pub async fn call(&self, phase: Phase, context: &ReleaseContext) -> Result<(), PluginError> {
        self.module.call(phase, &self.spec.config, context).await
    }
}

impl fmt::Debug for ResolvedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPlugin")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Ordered plugins of the current release run.
#[derive(Debug, Clone, Default)]
pub struct PluginStore {
    plugins: Vec<ResolvedPlugin>,
}

impl PluginStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly resolved list.
    pub(crate) fn populate(&mut self, plugins: Vec<ResolvedPlugin>) {
        self.plugins = plugins;
    }

    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPlugin> {
        self.plugins.iter()
    }

    pub fn as_slice(&self) -> &[ResolvedPlugin] {
        &self.plugins
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(ResolvedPlugin::name).collect()
    }
}
