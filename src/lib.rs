// ABOUTME: Library root for release-recovery - exposes the orchestrator and its collaborators.
// ABOUTME: The CLI host is in main.rs.

pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod git;
pub mod logger;
pub mod orchestrator;
pub mod plugin;
pub mod resolver;

pub use context::{NextRelease, ReleaseContext, RunOptions};
pub use error::{Error, ErrorKind, Result};
pub use orchestrator::{Orchestrator, RunState};
pub use plugin::{DeploymentPlugin, Phase, PluginError};
