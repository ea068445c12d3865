// ABOUTME: Verify command implementation.
// ABOUTME: Resolves the configured plugins and lists the phases each implements.

use super::{build_orchestrator, release_context};
use release_recovery::Phase;
use release_recovery::config::Settings;
use release_recovery::error::Result;
use std::path::Path;

/// Run verify-conditions and print the resolved plugins.
pub async fn verify(cwd: &Path, plugin_dir: Option<&Path>, dry_run: bool) -> Result<()> {
    let settings = Settings::discover(cwd)?;
    let mut orchestrator = build_orchestrator(&settings, cwd, plugin_dir);
    let context = release_context(cwd, dry_run);

    orchestrator.verify_conditions(&settings.raw, &context).await?;

    println!("{} deployment plugin(s):", orchestrator.plugins().len());
    for plugin in orchestrator.plugins().iter() {
        let phases: Vec<_> = Phase::ALL
            .into_iter()
            .filter(|p| plugin.implements(*p))
            .map(|p| p.filename())
            .collect();
        if phases.is_empty() {
            println!("  {} (no phases)", plugin.name());
        } else {
            println!("  {}: {}", plugin.name(), phases.join(", "));
        }
    }

    orchestrator.reset();
    Ok(())
}
