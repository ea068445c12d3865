// ABOUTME: Deletes a release tag from the remote repository.
// ABOUTME: Used to undo the tag of a release whose publish step failed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ReleaseContext;
use crate::exec::{CommandError, CommandLine, CommandRunner, SystemCommandRunner};

pub const DEFAULT_REMOTE: &str = "origin";

/// Errors from deleting a tag.
#[derive(Debug, thiserror::Error)]
pub enum TagRemovalError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("refusing to delete invalid tag name {0:?}")]
    InvalidTag(String),
}

/// Removes a tag that was created for a release that did not happen.
#[async_trait]
pub trait TagRemover: Send + Sync {
    async fn delete_tag(
        &self,
        tag: &str,
        dry_run: bool,
        context: &ReleaseContext,
    ) -> Result<(), TagRemovalError>;
}

/// Deletes tags by pushing a delete ref with the system `git`.
#[derive(Clone)]
pub struct GitTagRemover {
    remote: String,
    runner: Arc<dyn CommandRunner>,
}

impl GitTagRemover {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemCommandRunner))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            runner,
        }
    }

    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// The command that deletes `tag`.
    pub fn delete_command(&self, tag: &str, dry_run: bool) -> CommandLine {
        let command = CommandLine::new("git")
            .args(["push", self.remote.as_str(), "--delete", tag])
            .env("GIT_TERMINAL_PROMPT", "0");
        if dry_run {
            command.arg("--dry-run")
        } else {
            command
        }
    }
}

impl Default for GitTagRemover {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagRemover for GitTagRemover {
    async fn delete_tag(
        &self,
        tag: &str,
        dry_run: bool,
        context: &ReleaseContext,
    ) -> Result<(), TagRemovalError> {
        // A leading '-' would be parsed by git as an option.
        if tag.trim().is_empty() || tag.starts_with('-') {
            return Err(TagRemovalError::InvalidTag(tag.to_string()));
        }

        let command = self
            .delete_command(tag, dry_run)
            .current_dir(context.cwd.clone());

        context
            .logger
            .log(&format!("Running git command: `{command}`"));

        self.runner.run(&command, &context.logger).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{Logger, MemoryLogger};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        commands: Mutex<Vec<CommandLine>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &CommandLine, _logger: &Logger) -> Result<(), CommandError> {
            self.commands.lock().push(command.clone());
            Ok(())
        }
    }

    fn context(memory: &MemoryLogger) -> ReleaseContext {
        ReleaseContext::new(memory.clone().into_logger()).cwd("/repo")
    }

    #[tokio::test]
    async fn deletes_tag_on_origin() {
        let runner = Arc::new(RecordingRunner::default());
        let remover = GitTagRemover::with_runner(runner.clone());
        let memory = MemoryLogger::new();

        remover
            .delete_tag("v1.0.0", false, &context(&memory))
            .await
            .unwrap();

        let commands = runner.commands.lock();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_string(), "git push origin --delete v1.0.0");
        assert_eq!(
            commands[0].current_dir.as_deref(),
            Some(std::path::Path::new("/repo"))
        );
        assert!(memory.contains("git push origin --delete v1.0.0"));
    }

    #[tokio::test]
    async fn dry_run_appends_flag() {
        let runner = Arc::new(RecordingRunner::default());
        let remover = GitTagRemover::with_runner(runner.clone()).remote("upstream");

        remover
            .delete_tag("v2.0.0", true, &context(&MemoryLogger::new()))
            .await
            .unwrap();

        assert_eq!(
            runner.commands.lock()[0].to_string(),
            "git push upstream --delete v2.0.0 --dry-run"
        );
    }

    #[tokio::test]
    async fn rejects_option_like_tags() {
        let runner = Arc::new(RecordingRunner::default());
        let remover = GitTagRemover::with_runner(runner.clone());

        let err = remover
            .delete_tag("--mirror", false, &context(&MemoryLogger::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, TagRemovalError::InvalidTag(_)));
        assert!(runner.commands.lock().is_empty());
    }
}
