// ABOUTME: In-memory logger that records every line with its scope.
// ABOUTME: Scoped children share the parent's buffer, so order is global.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Logger, ReleaseLogger, ScopeName, ScopedLogger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub scopes: Vec<String>,
    pub message: String,
}

/// Records log lines for later inspection.
///
/// Clones and scoped children write into the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    scopes: Vec<String>,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            entries: Arc::default(),
        }
    }

    pub fn into_logger(self) -> Logger {
        Arc::new(self)
    }

    /// Snapshot of everything logged so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Index of the first line containing `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.entries
            .lock()
            .iter()
            .position(|e| e.message.contains(needle))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.position(needle).is_some()
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            scopes: self.scopes.clone(),
            message: message.to_string(),
        });
    }
}

impl ReleaseLogger for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }

    fn scoped(&self) -> Option<&dyn ScopedLogger> {
        Some(self)
    }
}

impl ScopedLogger for MemoryLogger {
    fn scope_name(&self) -> ScopeName {
        ScopeName::from(self.scopes.as_slice())
    }

    fn scope(&self, scopes: &[String]) -> Logger {
        Arc::new(MemoryLogger {
            scopes: scopes.to_vec(),
            entries: Arc::clone(&self.entries),
        })
    }
}
