// ABOUTME: Test support utilities.
// ABOUTME: Provides recording plugins, a fake tag remover and context helpers.

use async_trait::async_trait;
use parking_lot::Mutex;
use release_recovery::git::{TagRemovalError, TagRemover};
use release_recovery::logger::MemoryLogger;
use release_recovery::plugin::{FnPlugin, Phase};
use release_recovery::{NextRelease, PluginError, ReleaseContext};
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("release_recovery=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Shared record of (plugin, phase) calls, in call order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, Phase)>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn calls(&self) -> Vec<(String, Phase)> {
        self.0.lock().clone()
    }

    /// Plugins called for `phase`, in order.
    pub fn plugins_for(&self, phase: Phase) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(_, p)| *p == phase)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn record(&self, plugin: &str, phase: Phase) {
        self.0.lock().push((plugin.to_string(), phase));
    }
}

/// Plugin implementing `phases`, recording every call into `log`.
#[allow(dead_code)]
pub fn recording_plugin(name: &str, phases: &[Phase], log: &CallLog) -> FnPlugin {
    phases.iter().fold(FnPlugin::new(), |plugin, &phase| {
        let name = name.to_string();
        let log = log.clone();
        plugin.on(phase, move |_config, context| {
            let name = name.clone();
            let log = log.clone();
            async move {
                log.record(&name, phase);
                context.logger.log(&format!("{name} ran {phase}"));
                Ok(())
            }
        })
    })
}

/// Plugin whose `phase` operation records the call and then fails with `error`.
#[allow(dead_code)]
pub fn failing_plugin(name: &str, phase: Phase, error: PluginError, log: &CallLog) -> FnPlugin {
    let name = name.to_string();
    let log = log.clone();
    FnPlugin::new().on(phase, move |_config, _context| {
        let name = name.clone();
        let log = log.clone();
        let error = error.clone();
        async move {
            log.record(&name, phase);
            Err(error)
        }
    })
}

/// Tag remover that records its calls instead of running git.
#[derive(Default)]
pub struct RecordingTagRemover {
    calls: Mutex<Vec<(String, bool)>>,
    fail: bool,
}

#[allow(dead_code)]
impl RecordingTagRemover {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A remover whose every deletion fails.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            fail: true,
        })
    }

    /// (tag, dry_run) of every deletion, in order.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TagRemover for RecordingTagRemover {
    async fn delete_tag(
        &self,
        tag: &str,
        dry_run: bool,
        context: &ReleaseContext,
    ) -> Result<(), TagRemovalError> {
        self.calls.lock().push((tag.to_string(), dry_run));
        context.logger.log(&format!("deleting {tag}"));
        if self.fail {
            return Err(TagRemovalError::InvalidTag(tag.to_string()));
        }
        Ok(())
    }
}

/// Context for release v1.0.0 logging into `memory` under the host's scope.
#[allow(dead_code)]
pub fn release_context(memory: &MemoryLogger) -> ReleaseContext {
    ReleaseContext::new(memory.clone().into_logger()).next_release(NextRelease::from_version("1.0.0"))
}

/// Logger scoped like a host running this tool as one of its plugins.
#[allow(dead_code)]
pub fn host_logger() -> MemoryLogger {
    MemoryLogger::with_scope(["semantic-release", "release-recovery"])
}
