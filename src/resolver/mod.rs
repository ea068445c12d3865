// ABOUTME: Locates installed deployment plugins by name.
// ABOUTME: A missing plugin resolves to None; the caller decides if that is fatal.

mod directory;

pub use directory::{DEFAULT_PLUGIN_DIR, DirectoryResolver};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::plugin::DeploymentPlugin;

/// Looks up an installed plugin by name.
#[async_trait]
pub trait PluginResolver: Send + Sync {
    /// Returns `None` when no plugin called `name` is installed.
    async fn resolve(&self, name: &str) -> Option<Arc<dyn DeploymentPlugin>>;
}

/// Registry of plugins linked into the process.
#[derive(Clone, Default)]
pub struct StaticResolver {
    plugins: HashMap<String, Arc<dyn DeploymentPlugin>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `plugin` under `name`, replacing any earlier registration.
    pub fn register<P>(mut self, name: impl Into<String>, plugin: P) -> Self
    where
        P: DeploymentPlugin + 'static,
    {
        self.plugins.insert(name.into(), Arc::new(plugin));
        self
    }

    pub fn register_shared(
        mut self,
        name: impl Into<String>,
        plugin: Arc<dyn DeploymentPlugin>,
    ) -> Self {
        self.plugins.insert(name.into(), plugin);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl PluginResolver for StaticResolver {
    async fn resolve(&self, name: &str) -> Option<Arc<dyn DeploymentPlugin>> {
        self.plugins.get(name).cloned()
    }
}

/// Tries each resolver in turn; the first hit wins.
#[derive(Clone, Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn PluginResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(mut self, resolver: R) -> Self
    where
        R: PluginResolver + 'static,
    {
        self.resolvers.push(Arc::new(resolver));
        self
    }
}

#[async_trait]
impl PluginResolver for ResolverChain {
    async fn resolve(&self, name: &str) -> Option<Arc<dyn DeploymentPlugin>> {
        for resolver in &self.resolvers {
            if let Some(plugin) = resolver.resolve(name).await {
                return Some(plugin);
            }
        }
        None
    }
}
