// ABOUTME: Derives per-plugin loggers from the context's logger.
// ABOUTME: Adds or removes a sub-plugin's name from the scope stack.

use std::sync::Arc;

use super::Logger;
use crate::context::ReleaseContext;

/// Logger for lines written by the sub-plugin itself.
///
/// Lines read like `[host] [orchestrator] [@x/npm] ...`.
pub fn for_sub_plugin(context: &ReleaseContext, plugin_name: &str) -> Logger {
    derive(context, |mut scopes| {
        scopes.push(plugin_name.to_string());
        scopes
    })
}

/// Logger for lines the orchestrator writes about a sub-plugin.
///
/// Any occurrence of the plugin's name is dropped from the scope stack.
pub fn for_orchestrator(context: &ReleaseContext, plugin_name: &str) -> Logger {
    derive(context, |scopes| {
        scopes.into_iter().filter(|s| s != plugin_name).collect()
    })
}

fn derive(context: &ReleaseContext, adjust: impl FnOnce(Vec<String>) -> Vec<String>) -> Logger {
    let logger = &context.logger;
    match logger.scoped() {
        Some(scoped) => {
            let scopes = adjust(scoped.scope_name().into_stack());
            scoped.scope(&scopes)
        }
        None => Arc::clone(logger),
    }
}
