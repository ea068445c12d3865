// ABOUTME: Publish phase with tag cleanup when a deployment plugin fails.
// ABOUTME: The failing plugin's error is re-raised unchanged after cleanup.

use serde_json::Value;

use super::Orchestrator;
use crate::context::ReleaseContext;
use crate::error::{Error, Result};
use crate::logger::{for_orchestrator, for_sub_plugin};
use crate::plugin::{Phase, PluginError};

impl Orchestrator {
    /// Forward publish to each plugin, deleting the planned tag on failure.
    ///
    /// Plugins after the failing one do not run. Retrying is up to whoever
    /// runs the release; deleting the tag only makes sure the retry does not
    /// collide with the tag of the failed attempt.
    pub async fn publish(&self, _raw_config: &Value, context: &ReleaseContext) -> Result<()> {
        self.warn_if_inactive(Phase::Publish);

        match context.planned_tag() {
            Some(tag) => context.logger.log(&format!(
                "Publishing release {tag}. If a deployment plugin fails, git tag {tag} will be deleted."
            )),
            None => context
                .logger
                .log("Publishing release. No git tag is planned, so there is nothing to clean up on failure."),
        }

        for plugin in self.store.iter() {
            if !plugin.implements(Phase::Publish) {
                continue;
            }

            let orchestrator_context =
                context.with_logger(for_orchestrator(context, plugin.name()));
            orchestrator_context.logger.log(&format!(
                "Running publish step for deployment plugin: {}",
                plugin.name()
            ));

            let plugin_context = context.with_logger(for_sub_plugin(context, plugin.name()));
            if let Err(err) = plugin.call(Phase::Publish, &plugin_context).await {
                return Err(self
                    .recover(plugin.name(), err, &orchestrator_context)
                    .await);
            }
        }

        Ok(())
    }

    /// Delete the planned tag after `plugin` failed, and pick the error to return.
    ///
    /// If the tag cannot be deleted, that failure is returned and the publish
    /// error travels inside it.
    async fn recover(&self, plugin: &str, err: PluginError, context: &ReleaseContext) -> Error {
        let logger = &context.logger;
        logger.error(&format!(
            "Deployment plugin {plugin} failed to publish: {err}"
        ));

        let Some(tag) = context.planned_tag() else {
            logger.log("No git tag was planned for this release, so there is nothing to clean up.");
            logger.log(&format!("Re-throwing the error from {plugin}."));
            return Error::Plugin(err);
        };

        logger.log(
            "No worries! I will clean up after the failed deployment so you can retry it.",
        );
        logger.log(&format!("Deleting git tag {tag}..."));
        if context.is_dry_run() {
            logger.log("(Not really deleting it. This is a dry run, so I am only pretending.)");
        }

        if let Err(source) = self
            .tag_remover
            .delete_tag(tag, context.is_dry_run(), context)
            .await
        {
            logger.error(&format!(
                "Failed to delete git tag {tag}: {source}. Delete it by hand before retrying. \
                 The original error from {plugin} was: {err}"
            ));
            return Error::Compensation {
                tag: tag.to_string(),
                plugin: plugin.to_string(),
                source,
                original: err,
            };
        }

        logger.log("Done! Cleanup is complete and you should be able to retry the deployment now.");
        logger.log(&format!("Re-throwing the error from {plugin}."));
        Error::Plugin(err)
    }
}
