// ABOUTME: Logger that narrates through tracing events.
// ABOUTME: The scope stack is attached to every event as a `scope` field.

use std::sync::Arc;

use super::{Logger, ReleaseLogger, ScopeName, ScopedLogger, render_scopes};

/// Default logger of the CLI host.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    scopes: Vec<String>,
}

impl TracingLogger {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn into_logger(self) -> Logger {
        Arc::new(self)
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

impl ReleaseLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(scope = %render_scopes(&self.scopes), "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(scope = %render_scopes(&self.scopes), "{message}");
    }

    fn scoped(&self) -> Option<&dyn ScopedLogger> {
        Some(self)
    }
}

impl ScopedLogger for TracingLogger {
    fn scope_name(&self) -> ScopeName {
        ScopeName::from(self.scopes.as_slice())
    }

    fn scope(&self, scopes: &[String]) -> Logger {
        Arc::new(TracingLogger {
            scopes: scopes.to_vec(),
        })
    }
}
