// ABOUTME: Lifecycle orchestrator forwarding release phases to deployment plugins.
// ABOUTME: Resolves plugins at verify-conditions and deletes the tag if publish fails.

mod publish;
mod store;

pub use store::{PluginStore, ResolvedPlugin};

use std::sync::Arc;

use serde_json::Value;

use crate::config::parse_plugins;
use crate::context::ReleaseContext;
use crate::error::{Error, Result};
use crate::git::{GitTagRemover, TagRemover};
use crate::logger::for_sub_plugin;
use crate::plugin::Phase;
use crate::resolver::PluginResolver;

/// Where the orchestrator is in a release run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No plugins resolved. Initial state, and the state after a reset.
    Idle,
    /// verify-conditions is parsing configuration and resolving plugins.
    Verifying,
    /// Plugins resolved; phases are forwarded to them.
    Active,
}

/// Drives the deployment plugins of one release run.
///
/// The host calls one entry point per phase, passing its raw configuration
/// and the release context each time. Plugins are resolved by
/// [`verify_conditions`](Self::verify_conditions) and kept until the next
/// call to it or to [`reset`](Self::reset).
///
/// Plugins run one at a time, in configuration order. Each receives a copy
/// of the context whose logger is scoped to the plugin's name.
pub struct Orchestrator {
    resolver: Arc<dyn PluginResolver>,
    tag_remover: Arc<dyn TagRemover>,
    store: PluginStore,
    state: RunState,
}

impl Orchestrator {
    pub fn new(resolver: Arc<dyn PluginResolver>) -> Self {
        Self {
            resolver,
            tag_remover: Arc::new(GitTagRemover::new()),
            store: PluginStore::new(),
            state: RunState::Idle,
        }
    }

    /// Replace the tag remover used to undo a failed publish.
    pub fn with_tag_remover(mut self, tag_remover: Arc<dyn TagRemover>) -> Self {
        self.tag_remover = tag_remover;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Resolved plugins of the current run, in execution order.
    pub fn plugins(&self) -> &PluginStore {
        &self.store
    }

    /// Forget the resolved plugins. Safe to call at any time, any number of times.
    pub fn reset(&mut self) {
        self.store.clear();
        self.state = RunState::Idle;
    }

    /// Run the entry point for `phase`.
    pub async fn run(
        &mut self,
        phase: Phase,
        raw_config: &Value,
        context: &ReleaseContext,
    ) -> Result<()> {
        match phase {
            Phase::VerifyConditions => self.verify_conditions(raw_config, context).await,
            Phase::AnalyzeCommits => self.analyze_commits(raw_config, context).await,
            Phase::VerifyRelease => self.verify_release(raw_config, context).await,
            Phase::GenerateNotes => self.generate_notes(raw_config, context).await,
            Phase::Prepare => self.prepare(raw_config, context).await,
            Phase::Publish => self.publish(raw_config, context).await,
            Phase::AddChannel => self.add_channel(raw_config, context).await,
            Phase::Success => self.success(raw_config, context).await,
            Phase::Fail => self.fail(raw_config, context).await,
        }
    }

    /// Parse the plugin list, resolve every plugin, then forward the phase.
    ///
    /// Starts from an empty store. If any plugin cannot be resolved the store
    /// stays empty and the orchestrator is back to [`RunState::Idle`].
    pub async fn verify_conditions(
        &mut self,
        raw_config: &Value,
        context: &ReleaseContext,
    ) -> Result<()> {
        self.reset();
        self.state = RunState::Verifying;

        let logger = &context.logger;
        logger.log(
            "Hello! I run your deployment plugins and, if one of them fails to publish, \
             delete the release's git tag so the release can simply be retried.",
        );

        let resolved = match self.resolve_plugins(raw_config).await {
            Ok(resolved) => resolved,
            Err(e) => {
                self.state = RunState::Idle;
                return Err(e);
            }
        };
        self.store.populate(resolved);
        self.state = RunState::Active;

        logger.log(&format!(
            "Deployment plugins: {}",
            self.store.names().join(", ")
        ));
        if context.is_dry_run() {
            logger.log(
                "Dry-run mode is enabled. Any cleanup command I run will be run in dry-run mode too.",
            );
        }

        self.run_phase(Phase::VerifyConditions, context).await
    }

    async fn resolve_plugins(&self, raw_config: &Value) -> Result<Vec<ResolvedPlugin>> {
        let specs = parse_plugins(raw_config)?;

        let mut resolved = Vec::with_capacity(specs.len());
        for spec in specs {
            let Some(module) = self.resolver.resolve(&spec.name).await else {
                return Err(Error::PluginNotInstalled { name: spec.name });
            };
            tracing::debug!(plugin = %spec.name, "deployment plugin resolved");
            resolved.push(ResolvedPlugin { spec, module });
        }
        Ok(resolved)
    }

    pub async fn analyze_commits(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::AnalyzeCommits, context).await
    }

    /// Announce the planned tag, then forward the phase.
    pub async fn verify_release(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        if let Some(tag) = context.planned_tag() {
            context.logger.log(&format!(
                "Next release is planned to be {tag}. If a deployment plugin fails to publish, \
                 I will delete the git tag {tag}."
            ));
            if context.is_dry_run() {
                context
                    .logger
                    .log("Well, I will pretend to delete it, since this is a dry run.");
            }
        }

        self.run_phase(Phase::VerifyRelease, context).await
    }

    pub async fn generate_notes(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::GenerateNotes, context).await
    }

    pub async fn prepare(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::Prepare, context).await
    }

    pub async fn add_channel(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::AddChannel, context).await
    }

    pub async fn success(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::Success, context).await
    }

    pub async fn fail(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.run_phase(Phase::Fail, context).await
    }

    /// Forward `phase` to every plugin implementing it, stopping at the first failure.
    async fn run_phase(&self, phase: Phase, context: &ReleaseContext) -> Result<()> {
        self.warn_if_inactive(phase);

        for plugin in self.store.iter() {
            if !plugin.implements(phase) {
                continue;
            }
            tracing::debug!(plugin = plugin.name(), %phase, "forwarding phase");

            let plugin_context = context.with_logger(for_sub_plugin(context, plugin.name()));
            plugin.call(phase, &plugin_context).await?;
        }
        Ok(())
    }

    fn warn_if_inactive(&self, phase: Phase) {
        if self.state != RunState::Active {
            tracing::warn!(%phase, state = ?self.state, "phase called without resolved plugins");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryLogger;
    use crate::resolver::StaticResolver;
    use serde_json::json;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(Arc::new(StaticResolver::new()))
    }

    #[test]
    fn starts_idle() {
        let orchestrator = orchestrator();
        assert_eq!(orchestrator.state(), RunState::Idle);
        assert!(orchestrator.plugins().is_empty());
    }

    #[tokio::test]
    async fn config_error_returns_to_idle() {
        let mut orchestrator = orchestrator();
        let context = ReleaseContext::new(MemoryLogger::new().into_logger());

        let err = orchestrator
            .verify_conditions(&json!({}), &context)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(orchestrator.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn phases_without_plugins_do_nothing() {
        let mut orchestrator = orchestrator();
        let context = ReleaseContext::new(MemoryLogger::new().into_logger());

        for phase in Phase::ALL.into_iter().skip(1) {
            orchestrator.run(phase, &json!({}), &context).await.unwrap();
        }
    }
}
