use std::sync::{Mutex, PoisonError};

use crate::error::ErrorRecord;

/// Hook invoked at the edges of chain control flow.
///
/// Kept outside the core contract: the executor behaves identically under
/// any implementation, and the default is a no-op. All methods default to
/// doing nothing, so implementations only override the hooks they care
/// about.
pub trait ChainObserver: Send + Sync {
    /// A step is about to be driven.
    fn on_step_start(&self, _index: usize, _name: &str) {}

    /// A failure was captured and attributed.
    fn on_step_failure(&self, _name: &str, _error: &ErrorRecord) {}

    /// The run produced an envelope with the given status.
    fn on_chain_complete(&self, _status: u16) {}
}

/// Default observer; ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ChainObserver for NoopObserver {}

/// Emits a structured `tracing` event for each hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ChainObserver for TracingObserver {
    fn on_step_start(&self, index: usize, name: &str) {
        tracing::debug!(index, step = name, "driving step");
    }

    fn on_step_failure(&self, name: &str, error: &ErrorRecord) {
        tracing::error!(step = name, %error, "step failed");
    }

    fn on_chain_complete(&self, status: u16) {
        tracing::debug!(status, "chain completed");
    }
}

/// A single recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    StepStart { index: usize, name: String },
    StepFailure { name: String, message: String },
    ChainComplete { status: u16 },
}

/// Records every hook invocation for later assertion. Test support.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: ObserverEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ChainObserver for RecordingObserver {
    fn on_step_start(&self, index: usize, name: &str) {
        self.push(ObserverEvent::StepStart {
            index,
            name: name.to_string(),
        });
    }

    fn on_step_failure(&self, name: &str, error: &ErrorRecord) {
        self.push(ObserverEvent::StepFailure {
            name: name.to_string(),
            message: error.to_string(),
        });
    }

    fn on_chain_complete(&self, status: u16) {
        self.push(ObserverEvent::ChainComplete { status });
    }
}
