// ABOUTME: Deployment plugin assembled from async closures, one per phase.
// ABOUTME: Phases without a closure are reported as not implemented.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::{DeploymentPlugin, Phase, PluginConfig, PluginError};
use crate::context::ReleaseContext;

pub type PhaseFuture = BoxFuture<'static, Result<(), PluginError>>;

type PhaseOp = Arc<dyn Fn(PluginConfig, ReleaseContext) -> PhaseFuture + Send + Sync>;

/// In-process plugin with an optional operation per phase.
///
/// ```
/// use release_recovery::plugin::{FnPlugin, Phase};
///
/// let plugin = FnPlugin::new().on(Phase::Publish, |_config, context| async move {
///     context.logger.log("published");
///     Ok(())
/// });
/// ```
#[derive(Clone, Default)]
pub struct FnPlugin {
    ops: HashMap<Phase, PhaseOp>,
}

impl FnPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the operation for `phase`, replacing any earlier one.
    pub fn on<F, Fut>(mut self, phase: Phase, op: F) -> Self
    where
        F: Fn(PluginConfig, ReleaseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), PluginError>> + Send + 'static,
    {
        self.ops
            .insert(phase, Arc::new(move |config, context| op(config, context).boxed()));
        self
    }

    pub fn phases(&self) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|p| self.ops.contains_key(p))
            .collect()
    }
}

#[async_trait]
impl DeploymentPlugin for FnPlugin {
    fn implements(&self, phase: Phase) -> bool {
        self.ops.contains_key(&phase)
    }

    async fn call(
        &self,
        phase: Phase,
        config: &PluginConfig,
        context: &ReleaseContext,
    ) -> Result<(), PluginError> {
        match self.ops.get(&phase) {
            Some(op) => op(config.clone(), context.clone()).await,
            None => Ok(()),
        }
    }
}
