// ABOUTME: Logger abstraction used by the orchestrator and sub-plugins.
// ABOUTME: Scope derivation is an optional capability of a logger.

mod memory;
mod scope;
mod tracing_logger;

pub use memory::{LogEntry, LogLevel, MemoryLogger};
pub use scope::{for_orchestrator, for_sub_plugin};
pub use tracing_logger::TracingLogger;

use std::sync::Arc;

/// Shared handle to a logger.
pub type Logger = Arc<dyn ReleaseLogger>;

/// Narration sink for a release run.
pub trait ReleaseLogger: Send + Sync {
    fn log(&self, message: &str);

    fn error(&self, message: &str);

    /// Scope derivation capability.
    ///
    /// Loggers that cannot derive scoped children keep the default and are
    /// passed through unchanged by [`for_sub_plugin`] and [`for_orchestrator`].
    fn scoped(&self) -> Option<&dyn ScopedLogger> {
        None
    }
}

/// Loggers that prefix their lines with a stack of scope labels.
pub trait ScopedLogger {
    /// Current scope of this logger.
    fn scope_name(&self) -> ScopeName;

    /// Derive a new logger with exactly `scopes`. Must not modify `self`.
    fn scope(&self, scopes: &[String]) -> Logger;
}

/// A logger's scope as reported by the logger itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeName {
    Single(String),
    Stack(Vec<String>),
}

impl ScopeName {
    /// Normalize into a stack of labels, outermost first.
    pub fn into_stack(self) -> Vec<String> {
        match self {
            ScopeName::Single(scope) => vec![scope],
            ScopeName::Stack(scopes) => scopes,
        }
    }
}

impl From<&[String]> for ScopeName {
    fn from(scopes: &[String]) -> Self {
        match scopes {
            [single] => ScopeName::Single(single.clone()),
            many => ScopeName::Stack(many.to_vec()),
        }
    }
}

/// Render a scope stack the way log lines show it: `[a] [b]`.
pub fn render_scopes(scopes: &[String]) -> String {
    scopes
        .iter()
        .map(|s| format!("[{s}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
