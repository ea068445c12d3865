// ABOUTME: Command module aggregator for the release-recovery CLI.
// ABOUTME: Builds the orchestrator and release context shared by all commands.

mod release;
mod verify;

pub use release::release;
pub use verify::verify;

use release_recovery::config::Settings;
use release_recovery::git::GitTagRemover;
use release_recovery::logger::TracingLogger;
use release_recovery::resolver::DirectoryResolver;
use release_recovery::{Orchestrator, ReleaseContext};
use std::path::Path;
use std::sync::Arc;

/// Scope label of every line the CLI narrates.
const LOG_SCOPE: &str = "release-recovery";

fn build_orchestrator(settings: &Settings, cwd: &Path, plugin_dir: Option<&Path>) -> Orchestrator {
    let root = match plugin_dir {
        Some(dir) => cwd.join(dir),
        None => settings.plugin_root(cwd),
    };
    tracing::debug!(plugin_dir = %root.display(), "looking for plugins");

    let remover = GitTagRemover::new().remote(settings.remote.clone());
    Orchestrator::new(Arc::new(DirectoryResolver::new(root))).with_tag_remover(Arc::new(remover))
}

fn release_context(cwd: &Path, dry_run: bool) -> ReleaseContext {
    ReleaseContext::new(TracingLogger::new([LOG_SCOPE]).into_logger())
        .cwd(cwd)
        .dry_run(dry_run)
}
