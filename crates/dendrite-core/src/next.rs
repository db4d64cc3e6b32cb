use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tokio::sync::oneshot;

use crate::error::ErrorRecord;

/// The completion signal a step produces exactly once.
#[derive(Debug)]
pub enum Signal {
    /// Continue to the next step, optionally replacing the running context.
    Proceed(Option<Map<String, Value>>),
    /// Short-circuit the chain.
    Fail(ErrorRecord),
}

/// The continuation handed to each step.
///
/// Cloneable; the first signal from any clone settles the step and later
/// signals are ignored. Dropping every clone without signaling leaves the
/// outcome to the step's own future.
#[derive(Clone)]
pub struct Next {
    slot: Arc<Mutex<Option<oneshot::Sender<Signal>>>>,
}

impl Next {
    /// A fresh continuation plus the receiving half of its latch.
    pub(crate) fn latch() -> (Self, oneshot::Receiver<Signal>) {
        let (tx, rx) = oneshot::channel();
        let next = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (next, rx)
    }

    /// Signal success, carrying the running context forward unchanged,
    /// in-place mutations included.
    pub fn advance(&self) {
        self.settle(Signal::Proceed(None));
    }

    /// Signal success with a replacement data object for subsequent steps.
    pub fn advance_with(&self, data: Map<String, Value>) {
        self.settle(Signal::Proceed(Some(data)));
    }

    /// Signal failure and short-circuit the chain. Accepts anything
    /// convertible into an [`ErrorRecord`], bare messages included.
    pub fn fail(&self, error: impl Into<ErrorRecord>) {
        self.settle(Signal::Fail(error.into()));
    }

    fn settle(&self, signal: Signal) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = slot.take() {
            // The run may already have been abandoned; the signal is spent
            // either way.
            let _ = tx.send(signal);
        }
    }
}
