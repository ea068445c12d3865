// ABOUTME: Run command implementation.
// ABOUTME: A minimal host that drives every release phase through the orchestrator.

use super::{build_orchestrator, release_context};
use release_recovery::config::Settings;
use release_recovery::error::Result;
use release_recovery::{NextRelease, Phase};
use std::path::Path;

/// Run a whole release: every phase in order, or `fail` after the first failure.
pub async fn release(
    cwd: &Path,
    plugin_dir: Option<&Path>,
    next_release: NextRelease,
    dry_run: bool,
) -> Result<()> {
    let settings = Settings::discover(cwd)?;
    let mut orchestrator = build_orchestrator(&settings, cwd, plugin_dir);
    let context = release_context(cwd, dry_run).next_release(next_release.clone());
    let raw = &settings.raw;

    // Nothing has run yet, so there is nobody to notify.
    orchestrator.verify_conditions(raw, &context).await?;

    for phase in phases(&next_release) {
        if let Err(e) = orchestrator.run(phase, raw, &context).await {
            eprintln!("Release {} failed during {phase}: {e}", next_release.git_tag);

            if let Err(fail_err) = orchestrator.fail(raw, &context).await {
                tracing::warn!("fail step of a deployment plugin failed: {fail_err}");
            }
            orchestrator.reset();
            return Err(e);
        }
    }

    orchestrator.reset();
    println!("Release {} complete!", next_release.git_tag);
    Ok(())
}

fn phases(release: &NextRelease) -> Vec<Phase> {
    let mut phases = vec![
        Phase::AnalyzeCommits,
        Phase::VerifyRelease,
        Phase::GenerateNotes,
        Phase::Prepare,
        Phase::Publish,
    ];
    if release.channel.is_some() {
        phases.push(Phase::AddChannel);
    }
    phases.push(Phase::Success);
    phases
}
