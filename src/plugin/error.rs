// ABOUTME: Error raised by a sub-plugin phase operation.
// ABOUTME: Shared by reference so the orchestrator can re-raise the same error.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Failure of a sub-plugin phase.
///
/// Cloning shares the underlying error; [`PluginError::same_as`] tells whether
/// two values are the very same failure rather than equal-looking ones.
#[derive(Clone)]
pub struct PluginError(Arc<dyn StdError + Send + Sync + 'static>);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Message(String);

impl PluginError {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &PluginError) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for PluginError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}
