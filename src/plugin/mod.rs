// ABOUTME: Deployment plugin capability set and lifecycle phases.
// ABOUTME: Each phase is optional; callers check `implements` before calling.

mod error;
mod fn_plugin;
mod script;

pub use error::PluginError;
pub use fn_plugin::{FnPlugin, PhaseFuture};
pub use script::{MissingScript, ScriptPlugin};

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::context::ReleaseContext;

/// Per-plugin configuration object, as written by the user.
pub type PluginConfig = Map<String, Value>;

/// Lifecycle phases of a release, in the order the host runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    VerifyConditions,
    AnalyzeCommits,
    VerifyRelease,
    GenerateNotes,
    Prepare,
    Publish,
    AddChannel,
    Success,
    /// Failure notification. Runs instead of the remaining phases.
    Fail,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::VerifyConditions,
        Phase::AnalyzeCommits,
        Phase::VerifyRelease,
        Phase::GenerateNotes,
        Phase::Prepare,
        Phase::Publish,
        Phase::AddChannel,
        Phase::Success,
        Phase::Fail,
    ];

    /// Name of the phase as used in file names and log lines.
    pub fn filename(&self) -> &'static str {
        match self {
            Phase::VerifyConditions => "verify-conditions",
            Phase::AnalyzeCommits => "analyze-commits",
            Phase::VerifyRelease => "verify-release",
            Phase::GenerateNotes => "generate-notes",
            Phase::Prepare => "prepare",
            Phase::Publish => "publish",
            Phase::AddChannel => "add-channel",
            Phase::Success => "success",
            Phase::Fail => "fail",
        }
    }

    pub fn from_filename(name: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.filename() == name)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}

/// A deployment plugin: implements any subset of the lifecycle phases.
#[async_trait]
pub trait DeploymentPlugin: Send + Sync {
    /// Whether this plugin has an operation for `phase`.
    fn implements(&self, phase: Phase) -> bool;

    /// Run the plugin's operation for `phase`.
    ///
    /// Only called for phases where [`implements`](Self::implements) is true.
    async fn call(
        &self,
        phase: Phase,
        config: &PluginConfig,
        context: &ReleaseContext,
    ) -> Result<(), PluginError>;
}
