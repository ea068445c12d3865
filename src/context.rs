// ABOUTME: Release context threaded through every lifecycle phase.
// ABOUTME: Carries the logger, run options and the planned release.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::logger::Logger;

/// Options of the release run as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Destructive commands are only simulated.
    pub dry_run: bool,
}

/// The release the host is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextRelease {
    pub version: String,
    pub git_tag: String,
    pub channel: Option<String>,
    pub notes: Option<String>,
}

impl NextRelease {
    pub fn new(version: impl Into<String>, git_tag: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            git_tag: git_tag.into(),
            channel: None,
            notes: None,
        }
    }

    /// A release tagged `v<version>`.
    pub fn from_version(version: impl Into<String>) -> Self {
        let version = version.into();
        let git_tag = format!("v{version}");
        Self::new(version, git_tag)
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// Context handed to the orchestrator by the host, and to each sub-plugin.
///
/// Sub-plugins never see the host's context directly: each call gets a clone
/// whose `logger` is scoped to that plugin (see [`ReleaseContext::with_logger`]).
#[derive(Clone)]
pub struct ReleaseContext {
    pub logger: Logger,
    pub options: RunOptions,
    pub next_release: Option<NextRelease>,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
}

impl ReleaseContext {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            options: RunOptions::default(),
            next_release: None,
            cwd: PathBuf::from("."),
            env: HashMap::new(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    pub fn next_release(mut self, release: NextRelease) -> Self {
        self.next_release = Some(release);
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Derive a context identical to this one but logging through `logger`.
    pub fn with_logger(&self, logger: Logger) -> Self {
        Self {
            logger,
            ..self.clone()
        }
    }

    /// Tag of the planned release, if the host has decided on one.
    pub fn planned_tag(&self) -> Option<&str> {
        self.next_release.as_ref().map(|r| r.git_tag.as_str())
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }
}

impl fmt::Debug for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseContext")
            .field("options", &self.options)
            .field("next_release", &self.next_release)
            .field("cwd", &self.cwd)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
